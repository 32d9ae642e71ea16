mod request;
mod response;

use crate::auth::Authenticated;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::Payload;
use crate::handler::AppModule;
use crate::route::display_offset;
use crate::route::request::request::{
    Review, ReviewRequest, ReviewTransformer, SubmitRequest, Transformer, WithdrawRequest,
};
use crate::route::request::response::{Presenter, Reviewed};
use application::service::{
    GetBookingRequestService, ReviewBookingRequestService, ReviseBookingRequestService,
    SubmitBookingRequestService, WithdrawBookingRequestService,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

pub trait BookingRequestRouter {
    fn route_booking_request(self) -> Self;
}

impl BookingRequestRouter for Router<AppModule> {
    fn route_booking_request(self) -> Self {
        self.route(
            "/booking-attempts",
            get(
                |State(module): State<AppModule>, Authenticated(principal): Authenticated| async move {
                    Controller::new((), Presenter(display_offset(&module)))
                        .bypass(|| module.get_booking_requests(&principal))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 Authenticated(principal): Authenticated,
                 Payload(req): Payload<SubmitRequest>| async move {
                    Controller::new(Transformer, Presenter(display_offset(&module)))
                        .intake(req)
                        .handle(|dto| async move {
                            module.submit_booking_request(&principal, dto).await
                        })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Authenticated(principal): Authenticated,
                 Payload(req): Payload<ReviewRequest>| async move {
                    Controller::new(ReviewTransformer, Presenter(display_offset(&module)))
                        .try_intake(req)
                        .map_err(ErrorStatus::from)?
                        .handle(|review| async move {
                            match review {
                                Review::Revise(dto) => module
                                    .revise_booking_request(&principal, dto)
                                    .await
                                    .map(Reviewed::Revised),
                                Review::Approve(dto) => module
                                    .approve_booking_request(&principal, dto)
                                    .await
                                    .map(Reviewed::Approved),
                                Review::Reject(dto) => module
                                    .reject_booking_request(&principal, dto)
                                    .await
                                    .map(Reviewed::Rejected),
                            }
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 Authenticated(principal): Authenticated,
                 Payload(req): Payload<WithdrawRequest>| async move {
                    Controller::new(Transformer, Presenter(display_offset(&module)))
                        .intake(req)
                        .handle(|dto| async move {
                            module.withdraw_booking_request(&principal, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/booking-attempts/mine",
            get(
                |State(module): State<AppModule>, Authenticated(principal): Authenticated| async move {
                    Controller::new((), Presenter(display_offset(&module)))
                        .bypass(|| module.get_own_booking_requests(&principal))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
