//! In-memory implementations of the kernel interfaces for service tests.
//!
//! A transaction holds the whole store exclusively and restores the snapshot taken at
//! its start unless committed.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use time::macros::{datetime, offset};
use time::{OffsetDateTime, UtcOffset};
use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::notify::{Delivery, DependOnNotifier, Mail, Notifier};
use kernel::interface::query::{
    BookingQuery, BookingRequestQuery, DependOnBookingQuery, DependOnBookingRequestQuery,
    DependOnItemQuery, DependOnLoanQuery, DependOnVenueQuery, ItemQuery, LoanQuery, VenueQuery,
};
use kernel::interface::update::{
    BookingModifier, BookingRequestModifier, DependOnBookingModifier,
    DependOnBookingRequestModifier, DependOnItemModifier, DependOnLoanModifier,
    DependOnVenueModifier, ItemModifier, LoanModifier, VenueModifier,
};
use kernel::prelude::entity::{
    Booking, BookingId, BookingRequest, Identity, Item, ItemId, Loan, LoanId, Principal,
    Quantity, RequestId, RequestStatus, ReturnedAt, Role, UserEmail, UserId, UserName, Venue,
    VenueColor, VenueName,
};
use kernel::{fail, KernelError};

use crate::transfer::ItemSeedDto;

#[derive(Debug, Clone, Default)]
pub struct Store {
    venues: BTreeMap<VenueName, Venue>,
    bookings: Vec<Booking>,
    requests: Vec<BookingRequest>,
    items: BTreeMap<ItemId, Item>,
    loans: Vec<Loan>,
}

#[derive(Clone, Default)]
pub struct MemoryDatabase(Arc<Mutex<Store>>);

pub struct MemoryTransaction {
    store: OwnedMutexGuard<Store>,
    snapshot: Option<Store>,
}

impl Deref for MemoryTransaction {
    type Target = Store;
    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl DerefMut for MemoryTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.store = snapshot;
        }
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(mut self) -> error_stack::Result<(), KernelError> {
        self.snapshot = None;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;

    async fn transact(&self) -> error_stack::Result<MemoryTransaction, KernelError> {
        let store = self.0.clone().lock_owned().await;
        let snapshot = Some(store.clone());
        Ok(MemoryTransaction { store, snapshot })
    }
}

pub struct MemoryRepository;

#[async_trait::async_trait]
impl BookingQuery for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        Ok(con.bookings.clone())
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        Ok(con.bookings.iter().find(|b| b.id() == id).cloned())
    }

    async fn find_by_venue(
        &self,
        con: &mut MemoryTransaction,
        venue: &VenueName,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        Ok(con
            .bookings
            .iter()
            .filter(|b| b.venue() == venue)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl BookingModifier for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        con.bookings.push(booking.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        let slot = con
            .bookings
            .iter_mut()
            .find(|b| b.id() == booking.id())
            .ok_or_else(|| fail(KernelError::NotFound, "Booking not found"))?;
        *slot = booking.clone();
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        booking_id: &BookingId,
    ) -> error_stack::Result<(), KernelError> {
        let before = con.bookings.len();
        con.bookings.retain(|b| b.id() != booking_id);
        if con.bookings.len() == before {
            return Err(fail(KernelError::NotFound, "Booking not found"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl VenueQuery for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Venue>, KernelError> {
        Ok(con.venues.values().cloned().collect())
    }

    async fn find_by_name(
        &self,
        con: &mut MemoryTransaction,
        name: &VenueName,
    ) -> error_stack::Result<Option<Venue>, KernelError> {
        Ok(con.venues.get(name).cloned())
    }

    async fn lock(
        &self,
        con: &mut MemoryTransaction,
        name: &VenueName,
    ) -> error_stack::Result<Option<Venue>, KernelError> {
        Ok(con.venues.get(name).cloned())
    }
}

#[async_trait::async_trait]
impl VenueModifier for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn upsert(
        &self,
        con: &mut MemoryTransaction,
        venue: &Venue,
    ) -> error_stack::Result<(), KernelError> {
        con.venues.insert(venue.name().clone(), venue.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookingRequestQuery for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
        Ok(con.requests.clone())
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &RequestId,
    ) -> error_stack::Result<Option<BookingRequest>, KernelError> {
        Ok(con.requests.iter().find(|r| r.id() == id).cloned())
    }

    async fn find_by_submitter(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
        Ok(con
            .requests
            .iter()
            .filter(|r| r.submitter().id() == user_id)
            .cloned()
            .collect())
    }

    async fn find_pending_by_venue(
        &self,
        con: &mut MemoryTransaction,
        venue: &VenueName,
    ) -> error_stack::Result<Vec<BookingRequest>, KernelError> {
        Ok(con
            .requests
            .iter()
            .filter(|r| r.venue() == venue && r.status() == &RequestStatus::PendingApproval)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl BookingRequestModifier for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        request: &BookingRequest,
    ) -> error_stack::Result<(), KernelError> {
        con.requests.push(request.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        request: &BookingRequest,
    ) -> error_stack::Result<(), KernelError> {
        let slot = con
            .requests
            .iter_mut()
            .find(|r| r.id() == request.id())
            .ok_or_else(|| fail(KernelError::NotFound, "Booking request not found"))?;
        *slot = request.clone();
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        request_id: &RequestId,
    ) -> error_stack::Result<(), KernelError> {
        con.requests.retain(|r| r.id() != request_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ItemQuery for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        Ok(con.items.values().cloned().collect())
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        Ok(con.items.get(id).cloned())
    }

    async fn count(&self, con: &mut MemoryTransaction) -> error_stack::Result<i64, KernelError> {
        Ok(con.items.len() as i64)
    }
}

#[async_trait::async_trait]
impl ItemModifier for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn create_if_absent(
        &self,
        con: &mut MemoryTransaction,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        con.items
            .entry(item.id().clone())
            .or_insert_with(|| item.clone());
        Ok(())
    }

    async fn take(
        &self,
        con: &mut MemoryTransaction,
        id: &ItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        let Some(item) = con.items.get_mut(id) else {
            return Ok(None);
        };
        if !item.can_lend(*quantity) {
            return Ok(None);
        }
        let remaining = *item.available().as_ref() - *quantity.as_ref();
        item.substitute(|item| *item.available = Quantity::new(remaining));
        Ok(Some(item.clone()))
    }

    async fn restore(
        &self,
        con: &mut MemoryTransaction,
        id: &ItemId,
        quantity: &Quantity,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        let Some(item) = con.items.get_mut(id) else {
            return Ok(None);
        };
        let restored = *item.available().as_ref() + *quantity.as_ref();
        if restored > *item.total().as_ref() {
            return Ok(None);
        }
        item.substitute(|item| *item.available = Quantity::new(restored));
        Ok(Some(item.clone()))
    }
}

#[async_trait::async_trait]
impl LoanQuery for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &LoanId,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        Ok(con.loans.iter().find(|l| l.id() == id).cloned())
    }

    async fn find_active(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Loan>, KernelError> {
        Ok(con.loans.iter().filter(|l| l.is_active()).cloned().collect())
    }

    async fn find_active_by_borrower(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Loan>, KernelError> {
        Ok(con
            .loans
            .iter()
            .filter(|l| l.is_active() && l.borrower().id() == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl LoanModifier for MemoryRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        loan: &Loan,
    ) -> error_stack::Result<(), KernelError> {
        con.loans.push(loan.clone());
        Ok(())
    }

    async fn close(
        &self,
        con: &mut MemoryTransaction,
        id: &LoanId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        let Some(loan) = con
            .loans
            .iter_mut()
            .find(|l| l.id() == id && l.is_active())
        else {
            return Ok(None);
        };
        loan.substitute(|loan| *loan.returned_at = Some(*returned_at));
        Ok(Some(loan.clone()))
    }
}

#[derive(Default)]
pub struct MemoryNotifier {
    failing: bool,
    sent: std::sync::Mutex<Vec<Mail>>,
}

#[async_trait::async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, mail: &Mail) -> error_stack::Result<Delivery, KernelError> {
        if self.failing {
            return Err(fail(KernelError::Internal, "mail provider unavailable"));
        }
        self.sent
            .lock()
            .map_err(|_| fail(KernelError::Internal, "poisoned"))?
            .push(mail.clone());
        Ok(Delivery::Sent { message_id: None })
    }
}

pub struct FixedClock(OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }

    fn display_offset(&self) -> UtcOffset {
        offset!(+8)
    }
}

pub struct TestModule {
    database: MemoryDatabase,
    notifier: MemoryNotifier,
    clock: FixedClock,
}

impl TestModule {
    pub fn empty_inventory() -> Self {
        let mut store = Store::default();
        for (name, color) in [("Room A", "#FF6F00"), ("Room B", "#00ACC1")] {
            let venue = Venue::new(VenueName::new(name), VenueColor::new(color));
            store.venues.insert(venue.name().clone(), venue);
        }
        Self {
            database: MemoryDatabase(Arc::new(Mutex::new(store))),
            notifier: MemoryNotifier::default(),
            clock: FixedClock(datetime!(2024-04-30 12:00 UTC)),
        }
    }

    pub fn new() -> Self {
        let module = Self::empty_inventory();
        {
            let mut store = module
                .database
                .0
                .try_lock()
                .expect("fresh store is unlocked");
            for seed in catalog() {
                let item = Item::from(seed);
                store.items.insert(item.id().clone(), item);
            }
        }
        module
    }

    pub fn with_failing_notifier() -> Self {
        let mut module = Self::new();
        module.notifier.failing = true;
        module
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.0
    }

    pub fn sent_mails(&self) -> Vec<Mail> {
        self.notifier.sent.lock().unwrap().clone()
    }
}

pub fn catalog() -> Vec<ItemSeedDto> {
    vec![
        ItemSeedDto {
            id: "lap-recorder".to_string(),
            name: "Lap Recorder".to_string(),
            category: "Audio Equipment".to_string(),
            description: None,
            quantity: 2,
        },
        ItemSeedDto {
            id: "projector".to_string(),
            name: "Projector".to_string(),
            category: "Electronics".to_string(),
            description: Some("Portable projector".to_string()),
            quantity: 1,
        },
    ]
}

pub fn admin() -> Principal {
    Principal::new(
        Identity::new(
            UserId::new("admin"),
            Some(UserName::new("Admin")),
            Some(UserEmail::new("admin@example.com")),
        ),
        Role::Admin,
    )
}

pub fn member(id: &str) -> Principal {
    Principal::new(
        Identity::new(
            UserId::new(id),
            Some(UserName::new(id)),
            Some(UserEmail::new(format!("{id}@example.com"))),
        ),
        Role::Member,
    )
}

pub fn member_without_email(id: &str) -> Principal {
    Principal::new(Identity::new(UserId::new(id), None, None), Role::Member)
}

impl DependOnDatabaseConnection for TestModule {
    type DatabaseConnection = MemoryDatabase;
    fn database_connection(&self) -> &MemoryDatabase {
        &self.database
    }
}

impl DependOnBookingQuery for TestModule {
    type BookingQuery = MemoryRepository;
    fn booking_query(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnBookingModifier for TestModule {
    type BookingModifier = MemoryRepository;
    fn booking_modifier(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnVenueQuery for TestModule {
    type VenueQuery = MemoryRepository;
    fn venue_query(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnVenueModifier for TestModule {
    type VenueModifier = MemoryRepository;
    fn venue_modifier(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnBookingRequestQuery for TestModule {
    type BookingRequestQuery = MemoryRepository;
    fn booking_request_query(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnBookingRequestModifier for TestModule {
    type BookingRequestModifier = MemoryRepository;
    fn booking_request_modifier(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnItemQuery for TestModule {
    type ItemQuery = MemoryRepository;
    fn item_query(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnItemModifier for TestModule {
    type ItemModifier = MemoryRepository;
    fn item_modifier(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnLoanQuery for TestModule {
    type LoanQuery = MemoryRepository;
    fn loan_query(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnLoanModifier for TestModule {
    type LoanModifier = MemoryRepository;
    fn loan_modifier(&self) -> &MemoryRepository {
        &MemoryRepository
    }
}

impl DependOnNotifier for TestModule {
    type Notifier = MemoryNotifier;
    fn notifier(&self) -> &MemoryNotifier {
        &self.notifier
    }
}

impl DependOnClock for TestModule {
    type Clock = FixedClock;
    fn clock(&self) -> &FixedClock {
        &self.clock
    }
}
