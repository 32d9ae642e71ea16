mod response;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::item::response::Presenter;
use application::service::GetItemService;
use axum::extract::State;
use axum::routing::get;
use axum::Router;

pub trait ItemRouter {
    fn route_item(self) -> Self;
}

impl ItemRouter for Router<AppModule> {
    fn route_item(self) -> Self {
        self.route(
            "/items",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), Presenter)
                    .bypass(|| module.get_items())
                    .await
                    .map_err(ErrorStatus::from)
            }),
        )
    }
}
