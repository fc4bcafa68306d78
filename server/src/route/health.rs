use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::response::HealthPresenter;
use axum::routing::get;
use axum::Router;

pub trait HealthRouter {
    fn route_health(self) -> Self;
}

impl HealthRouter for Router<AppModule> {
    fn route_health(self) -> Self {
        self.route(
            "/health",
            get(|| async {
                Controller::<(), _, (), (), ()>::new((), HealthPresenter)
                    .bypass(|| async { Ok::<_, ErrorStatus>(()) })
                    .await
            }),
        )
    }
}
