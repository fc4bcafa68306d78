use crate::controller::Exhaust;
use crate::response::Reply;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub struct HealthPresenter;

impl Exhaust<()> for HealthPresenter {
    type To = Reply<HealthResponse>;
    fn emit(&self, _: ()) -> Self::To {
        Reply::ok(HealthResponse { status: "ok" })
    }
}
