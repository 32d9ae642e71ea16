use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookingQuery, DependOnBookingQuery, DependOnVenueQuery, VenueQuery};
use kernel::interface::update::{BookingModifier, DependOnBookingModifier};
use kernel::prelude::entity::{
    format_display, Booking, BookingId, BookingTitle, Identity, Principal, TimeSpan, VenueName,
};
use kernel::prelude::schedule::{conflicts, group_by_venue, project_events};
use kernel::{fail, KernelError};

use crate::transfer::{
    BookingDto, BookingsByVenueDto, CalendarDto, CreateBookingDto, DeleteBookingDto,
    DisplayEventDto, UpdateBookingDto,
};

type TransactionOf<T> =
    <<T as DependOnDatabaseConnection>::DatabaseConnection as DatabaseConnection>::Transaction;

/// Checks that `candidate` may be written: its venue exists and no other booking of
/// that venue intersects its interval.
///
/// The venue row stays locked until `con` ends, so concurrent writers for the same
/// venue observe each other's commits.
pub(crate) async fn ensure_admissible<T>(
    module: &T,
    con: &mut TransactionOf<T>,
    candidate: &Booking,
) -> error_stack::Result<(), KernelError>
where
    T: DependOnBookingQuery + DependOnVenueQuery + DependOnClock + ?Sized,
{
    module
        .venue_query()
        .lock(con, candidate.venue())
        .await?
        .ok_or_else(|| {
            fail(
                KernelError::Validation,
                format!("Unknown venue: {}", candidate.venue().as_ref()),
            )
        })?;

    let existing = module
        .booking_query()
        .find_by_venue(con, candidate.venue())
        .await?;
    let conflicting = conflicts(candidate, &existing);
    if let Some(first) = conflicting.first() {
        let offset = module.clock().display_offset();
        return Err(fail(
            KernelError::Conflict,
            format!(
                "{} is already booked from {} to {} ({})",
                candidate.venue().as_ref(),
                format_display(first.span().start(), offset),
                format_display(first.span().end(), offset),
                first.title().as_ref()
            ),
        ));
    }
    Ok(())
}

fn creator_id(booking: &Booking) -> Option<&kernel::prelude::entity::UserId> {
    booking.creator().as_ref().map(Identity::id)
}

#[async_trait::async_trait]
pub trait GetBookingService:
    'static + Sync + Send + DependOnBookingQuery + DependOnVenueQuery
{
    async fn get_bookings(&self) -> error_stack::Result<Vec<BookingDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let bookings = self.booking_query().find_all(&mut connection).await?;
        Ok(bookings.into_iter().map(BookingDto::from).collect())
    }

    /// Every known venue appears, with an empty list when it has no bookings.
    async fn get_bookings_by_venue(&self) -> error_stack::Result<BookingsByVenueDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let venues = self.venue_query().find_all(&mut connection).await?;
        let bookings = self.booking_query().find_all(&mut connection).await?;

        let mut grouped = group_by_venue(bookings);
        for venue in venues {
            grouped.entry(venue.name().clone()).or_default();
        }
        Ok(grouped
            .into_iter()
            .map(|(venue, bookings)| {
                (
                    venue.into(),
                    bookings.into_iter().map(BookingDto::from).collect(),
                )
            })
            .collect())
    }

    async fn get_calendar(
        &self,
        dto: CalendarDto,
    ) -> error_stack::Result<Vec<DisplayEventDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let venues = self.venue_query().find_all(&mut connection).await?;
        let bookings = self.booking_query().find_all(&mut connection).await?;

        let selected = dto
            .venues
            .into_iter()
            .map(VenueName::new)
            .collect::<Vec<_>>();
        let events = project_events(&group_by_venue(bookings), &selected, &venues);
        Ok(events.into_iter().map(DisplayEventDto::from).collect())
    }
}

impl<T> GetBookingService for T where T: DependOnBookingQuery + DependOnVenueQuery {}

#[async_trait::async_trait]
pub trait CreateBookingService:
    'static
    + Sync
    + Send
    + DependOnBookingQuery
    + DependOnVenueQuery
    + DependOnBookingModifier
    + DependOnClock
{
    async fn create_booking(
        &self,
        principal: &Principal,
        dto: CreateBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        principal.ensure_admin()?;
        let booking = Booking::new(
            BookingId::generate(),
            BookingTitle::parse(&dto.title)?,
            VenueName::new(dto.venue),
            TimeSpan::new(dto.start, dto.end)?,
            Some(principal.identity().clone()),
        );

        let mut connection = self.database_connection().transact().await?;
        ensure_admissible(self, &mut connection, &booking).await?;
        self.booking_modifier()
            .create(&mut connection, &booking)
            .await?;
        connection.commit().await?;

        tracing::info!(
            "Booking {} created at {}",
            booking.id().as_ref(),
            booking.venue().as_ref()
        );
        Ok(BookingDto::from(booking))
    }
}

impl<T> CreateBookingService for T where
    T: DependOnBookingQuery + DependOnVenueQuery + DependOnBookingModifier + DependOnClock
{
}

#[async_trait::async_trait]
pub trait UpdateBookingService:
    'static
    + Sync
    + Send
    + DependOnBookingQuery
    + DependOnVenueQuery
    + DependOnBookingModifier
    + DependOnClock
{
    async fn update_booking(
        &self,
        principal: &Principal,
        dto: UpdateBookingDto,
    ) -> error_stack::Result<BookingDto, KernelError> {
        let title = dto.title.map(BookingTitle::parse).transpose()?;
        let venue = dto.venue.map(VenueName::new);

        let mut connection = self.database_connection().transact().await?;
        let id = BookingId::new(dto.id);
        let current = self
            .booking_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| fail(KernelError::NotFound, "Booking not found"))?;
        principal.ensure_owner_or_admin(creator_id(&current))?;

        let span = current.span().with(dto.start, dto.end)?;
        let updated = current.reconstruct(|booking| {
            if let Some(title) = title {
                booking.title = title;
            }
            if let Some(venue) = venue {
                booking.venue = venue;
            }
            booking.span = span;
        });

        ensure_admissible(self, &mut connection, &updated).await?;
        self.booking_modifier()
            .update(&mut connection, &updated)
            .await?;
        connection.commit().await?;

        tracing::info!("Booking {} updated", updated.id().as_ref());
        Ok(BookingDto::from(updated))
    }
}

impl<T> UpdateBookingService for T where
    T: DependOnBookingQuery + DependOnVenueQuery + DependOnBookingModifier + DependOnClock
{
}

#[async_trait::async_trait]
pub trait DeleteBookingService:
    'static + Sync + Send + DependOnBookingQuery + DependOnBookingModifier
{
    async fn delete_booking(
        &self,
        principal: &Principal,
        dto: DeleteBookingDto,
    ) -> error_stack::Result<(), KernelError> {
        let venue = dto.venue.map(VenueName::new);

        let mut connection = self.database_connection().transact().await?;
        let id = BookingId::new(dto.id);
        let current = self
            .booking_query()
            .find_by_id(&mut connection, &id)
            .await?
            .filter(|booking| venue.as_ref().map_or(true, |venue| booking.venue() == venue))
            .ok_or_else(|| fail(KernelError::NotFound, "Booking not found"))?;
        principal.ensure_owner_or_admin(creator_id(&current))?;

        self.booking_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;

        tracing::info!("Booking {} deleted", id.as_ref());
        Ok(())
    }
}

impl<T> DeleteBookingService for T where T: DependOnBookingQuery + DependOnBookingModifier {}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use uuid::Uuid;

    use kernel::{Detail, KernelError};

    use crate::service::{
        CreateBookingService, DeleteBookingService, GetBookingService, UpdateBookingService,
    };
    use crate::testing::{admin, member, TestModule};
    use crate::transfer::{CalendarDto, CreateBookingDto, DeleteBookingDto, UpdateBookingDto};

    fn create(title: &str, venue: &str, start: (u8, u8), end: (u8, u8)) -> CreateBookingDto {
        let day = datetime!(2024-05-01 00:00 UTC);
        CreateBookingDto {
            title: title.to_string(),
            venue: venue.to_string(),
            start: day.replace_hour(start.0).unwrap().replace_minute(start.1).unwrap(),
            end: day.replace_hour(end.0).unwrap().replace_minute(end.1).unwrap(),
        }
    }

    #[tokio::test]
    async fn overlapping_booking_is_rejected() {
        let module = TestModule::new();
        let first = module
            .create_booking(&admin(), create("Standup", "Room A", (9, 0), (10, 0)))
            .await
            .unwrap();

        let err = module
            .create_booking(&admin(), create("Review", "Room A", (9, 30), (10, 30)))
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Conflict);
        let detail = err.downcast_ref::<Detail>().unwrap();
        assert_eq!(
            detail.as_ref(),
            "Room A is already booked from 2024-05-01 17:00 to 2024-05-01 18:00 (Standup)"
        );

        module
            .create_booking(&admin(), create("Retro", "Room A", (10, 0), (11, 0)))
            .await
            .unwrap();
        module
            .create_booking(&admin(), create("Parallel", "Room B", (9, 30), (10, 30)))
            .await
            .unwrap();

        let bookings = module.get_bookings().await.unwrap();
        assert_eq!(bookings.len(), 3);
        assert!(bookings.iter().any(|booking| booking.id == first.id));
    }

    #[tokio::test]
    async fn creation_requires_admin_and_valid_input() {
        let module = TestModule::new();
        let err = module
            .create_booking(&member("bob"), create("Standup", "Room A", (9, 0), (10, 0)))
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Forbidden);

        let err = module
            .create_booking(&admin(), create("  ", "Room A", (9, 0), (10, 0)))
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Validation);

        let err = module
            .create_booking(&admin(), create("Standup", "Room A", (10, 0), (9, 0)))
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Validation);

        let err = module
            .create_booking(&admin(), create("Standup", "Nowhere", (9, 0), (10, 0)))
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Validation);
        assert!(module.get_bookings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_excludes_itself_from_conflicts() {
        let module = TestModule::new();
        let booking = module
            .create_booking(&admin(), create("Standup", "Room A", (9, 0), (10, 0)))
            .await
            .unwrap();
        module
            .create_booking(&admin(), create("Retro", "Room A", (11, 0), (12, 0)))
            .await
            .unwrap();

        let moved = module
            .update_booking(
                &admin(),
                UpdateBookingDto {
                    id: booking.id,
                    title: None,
                    venue: None,
                    start: Some(datetime!(2024-05-01 09:30 UTC)),
                    end: Some(datetime!(2024-05-01 10:30 UTC)),
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.title, "Standup");
        assert_eq!(moved.start, datetime!(2024-05-01 09:30 UTC));

        let err = module
            .update_booking(
                &admin(),
                UpdateBookingDto {
                    id: booking.id,
                    title: None,
                    venue: None,
                    start: None,
                    end: Some(datetime!(2024-05-01 11:30 UTC)),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Conflict);
    }

    #[tokio::test]
    async fn only_creator_or_admin_may_change_a_booking() {
        let module = TestModule::new();
        let booking = module
            .create_booking(&admin(), create("Standup", "Room A", (9, 0), (10, 0)))
            .await
            .unwrap();

        let err = module
            .delete_booking(
                &member("mallory"),
                DeleteBookingDto {
                    id: booking.id,
                    venue: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Forbidden);

        let err = module
            .delete_booking(
                &admin(),
                DeleteBookingDto {
                    id: booking.id,
                    venue: Some("Room B".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::NotFound);

        module
            .delete_booking(
                &admin(),
                DeleteBookingDto {
                    id: booking.id,
                    venue: Some("Room A".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(module.get_bookings().await.unwrap().is_empty());

        let err = module
            .update_booking(
                &admin(),
                UpdateBookingDto {
                    id: Uuid::new_v4(),
                    title: Some("Ghost".to_string()),
                    venue: None,
                    start: None,
                    end: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::NotFound);
    }

    #[tokio::test]
    async fn grouped_view_lists_every_venue_and_calendar_follows_selection() {
        let module = TestModule::new();
        module
            .create_booking(&admin(), create("Standup", "Room A", (9, 0), (10, 0)))
            .await
            .unwrap();

        let grouped = module.get_bookings_by_venue().await.unwrap();
        assert_eq!(grouped["Room A"].len(), 1);
        assert!(grouped["Room B"].is_empty());

        let events = module
            .get_calendar(CalendarDto {
                venues: vec!["Room A".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].color, "#FF6F00");

        let events = module
            .get_calendar(CalendarDto { venues: vec![] })
            .await
            .unwrap();
        assert!(events.is_empty());
    }
}
