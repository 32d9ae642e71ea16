mod request;
mod response;

use crate::auth::Authenticated;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::Payload;
use crate::handler::AppModule;
use crate::route::display_offset;
use crate::route::loan::request::{LoanRequest, Transformer};
use crate::route::loan::response::Presenter;
use application::service::{GetLoanService, LendItemService, ReturnLoanService};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use uuid::Uuid;

pub trait LoanRouter {
    fn route_loan(self) -> Self;
}

impl LoanRouter for Router<AppModule> {
    fn route_loan(self) -> Self {
        self.route(
            "/loans",
            get(
                |State(module): State<AppModule>, Authenticated(principal): Authenticated| async move {
                    Controller::new((), Presenter(display_offset(&module)))
                        .bypass(|| module.get_active_loans(&principal))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 Authenticated(principal): Authenticated,
                 Payload(req): Payload<LoanRequest>| async move {
                    Controller::new(Transformer, Presenter(display_offset(&module)))
                        .intake(req)
                        .handle(|dto| async move { module.lend_item(&principal, dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/:id/return",
            post(
                |State(module): State<AppModule>,
                 Authenticated(principal): Authenticated,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter(display_offset(&module)))
                        .intake(id)
                        .handle(|dto| async move { module.return_loan(&principal, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
