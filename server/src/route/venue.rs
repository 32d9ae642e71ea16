mod response;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::venue::response::Presenter;
use application::service::GetVenueService;
use axum::extract::State;
use axum::routing::get;
use axum::Router;

pub trait VenueRouter {
    fn route_venue(self) -> Self;
}

impl VenueRouter for Router<AppModule> {
    fn route_venue(self) -> Self {
        self.route(
            "/venues",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), Presenter)
                    .bypass(|| module.get_venues())
                    .await
                    .map_err(ErrorStatus::from)
            }),
        )
    }
}
