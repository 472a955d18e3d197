use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::{Request, Response};
use std::collections::HashSet;

pub struct OriginHeader {
    allowed_domains: HashSet<String>,
}

impl OriginHeader {
    /// `domains` is a comma separated list of origins.
    pub fn new(domains: &str) -> Self {
        let allowed_domains = domains
            .split(',')
            .map(str::trim)
            .filter(|domain| !domain.is_empty())
            .map(str::to_owned)
            .collect();
        OriginHeader { allowed_domains }
    }
}

#[rocket::async_trait]
impl Fairing for OriginHeader {
    fn info(&self) -> Info {
        Info {
            name: "CORS Policy",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if response.status() == Status::NotFound {
            return;
        }

        if let Some(origin) = request.headers().get_one("Origin") {
            if self.allowed_domains.contains(origin) {
                response.set_header(Header::new("Access-Control-Allow-Origin", origin.to_owned()));
                response.set_header(Header::new("Access-Control-Allow-Methods", "GET"));
            }
        }
    }
}
