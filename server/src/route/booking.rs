mod request;
mod response;

pub(super) use self::response::BookingResponse;

use crate::auth::Authenticated;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::Payload;
use crate::handler::AppModule;
use crate::route::booking::request::{
    CalendarRequest, CreateBookingRequest, DeleteBookingRequest, Transformer,
    UpdateBookingRequest,
};
use crate::route::booking::response::Presenter;
use crate::route::display_offset;
use application::service::{
    CreateBookingService, DeleteBookingService, GetBookingService, UpdateBookingService,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use axum_extra::extract::Query;

pub trait BookingRouter {
    fn route_booking(self) -> Self;
}

impl BookingRouter for Router<AppModule> {
    fn route_booking(self) -> Self {
        self.route(
            "/bookings",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), Presenter(display_offset(&module)))
                    .bypass(|| module.get_bookings())
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule>,
                 Authenticated(principal): Authenticated,
                 Payload(req): Payload<CreateBookingRequest>| async move {
                    Controller::new(Transformer, Presenter(display_offset(&module)))
                        .intake(req)
                        .handle(|dto| async move { module.create_booking(&principal, dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Authenticated(principal): Authenticated,
                 Payload(req): Payload<UpdateBookingRequest>| async move {
                    Controller::new(Transformer, Presenter(display_offset(&module)))
                        .intake(req)
                        .handle(|dto| async move { module.update_booking(&principal, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 Authenticated(principal): Authenticated,
                 Payload(req): Payload<DeleteBookingRequest>| async move {
                    Controller::new(Transformer, Presenter(display_offset(&module)))
                        .intake(req)
                        .handle(|dto| async move { module.delete_booking(&principal, dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/bookings/grouped",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), Presenter(display_offset(&module)))
                    .bypass(|| module.get_bookings_by_venue())
                    .await
                    .map_err(ErrorStatus::from)
            }),
        )
        .route(
            "/calendar",
            get(
                |State(module): State<AppModule>, Query(req): Query<CalendarRequest>| async move {
                    Controller::new(Transformer, Presenter(display_offset(&module)))
                        .intake(req)
                        .handle(|dto| async move { module.get_calendar(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
