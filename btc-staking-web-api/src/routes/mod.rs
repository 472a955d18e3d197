use rocket::fairing::AdHoc;

pub mod stakes;

pub fn mount() -> AdHoc {
    AdHoc::on_ignite("Attaching Routes", |rocket| async {
        rocket.mount("/", routes![stakes::by_staker])
    })
}
