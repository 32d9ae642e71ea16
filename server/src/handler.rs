use crate::config::Settings;
use driver::clock::SystemClock;
use driver::database::postgres::{
    PostgresBookingRepository, PostgresBookingRequestRepository, PostgresDatabase,
    PostgresItemRepository, PostgresLoanRepository, PostgresVenueRepository,
};
use driver::feed::PostgresChangeFeed;
use driver::identity::UserInfoVerifier;
use driver::mail::HttpMailer;
use error_stack::ResultExt;
use kernel::interface::clock::DependOnClock;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::identity::DependOnTokenVerifier;
use kernel::interface::notify::DependOnNotifier;
use kernel::interface::query::{
    DependOnBookingQuery, DependOnBookingRequestQuery, DependOnItemQuery, DependOnLoanQuery,
    DependOnVenueQuery,
};
use kernel::interface::update::{
    DependOnBookingModifier, DependOnBookingRequestModifier, DependOnItemModifier,
    DependOnLoanModifier, DependOnVenueModifier,
};
use kernel::prelude::entity::AdminAllowList;
use kernel::KernelError;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use vodca::References;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new(settings: &Settings) -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init(settings).await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    pgpool: PostgresDatabase,
    mailer: HttpMailer,
    verifier: UserInfoVerifier,
    feed: PostgresChangeFeed,
    wall_clock: SystemClock,
    admins: AdminAllowList,
}

impl Handler {
    pub async fn init(settings: &Settings) -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;
        let feed = PostgresChangeFeed::listen(&pgpool).await?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| "Failed to build http client")?;
        let verifier = UserInfoVerifier::from_env(client.clone())?;
        let mailer = HttpMailer::from_env(client);

        Ok(Self {
            pgpool,
            mailer,
            verifier,
            feed,
            wall_clock: SystemClock::new(settings.display_offset),
            admins: settings.admins.clone(),
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &PostgresDatabase {
        &self.pgpool
    }
}

impl DependOnBookingQuery for Handler {
    type BookingQuery = PostgresBookingRepository;
    fn booking_query(&self) -> &PostgresBookingRepository {
        &PostgresBookingRepository
    }
}

impl DependOnBookingModifier for Handler {
    type BookingModifier = PostgresBookingRepository;
    fn booking_modifier(&self) -> &PostgresBookingRepository {
        &PostgresBookingRepository
    }
}

impl DependOnVenueQuery for Handler {
    type VenueQuery = PostgresVenueRepository;
    fn venue_query(&self) -> &PostgresVenueRepository {
        &PostgresVenueRepository
    }
}

impl DependOnVenueModifier for Handler {
    type VenueModifier = PostgresVenueRepository;
    fn venue_modifier(&self) -> &PostgresVenueRepository {
        &PostgresVenueRepository
    }
}

impl DependOnBookingRequestQuery for Handler {
    type BookingRequestQuery = PostgresBookingRequestRepository;
    fn booking_request_query(&self) -> &PostgresBookingRequestRepository {
        &PostgresBookingRequestRepository
    }
}

impl DependOnBookingRequestModifier for Handler {
    type BookingRequestModifier = PostgresBookingRequestRepository;
    fn booking_request_modifier(&self) -> &PostgresBookingRequestRepository {
        &PostgresBookingRequestRepository
    }
}

impl DependOnItemQuery for Handler {
    type ItemQuery = PostgresItemRepository;
    fn item_query(&self) -> &PostgresItemRepository {
        &PostgresItemRepository
    }
}

impl DependOnItemModifier for Handler {
    type ItemModifier = PostgresItemRepository;
    fn item_modifier(&self) -> &PostgresItemRepository {
        &PostgresItemRepository
    }
}

impl DependOnLoanQuery for Handler {
    type LoanQuery = PostgresLoanRepository;
    fn loan_query(&self) -> &PostgresLoanRepository {
        &PostgresLoanRepository
    }
}

impl DependOnLoanModifier for Handler {
    type LoanModifier = PostgresLoanRepository;
    fn loan_modifier(&self) -> &PostgresLoanRepository {
        &PostgresLoanRepository
    }
}

impl DependOnNotifier for Handler {
    type Notifier = HttpMailer;
    fn notifier(&self) -> &HttpMailer {
        &self.mailer
    }
}

impl DependOnTokenVerifier for Handler {
    type TokenVerifier = UserInfoVerifier;
    fn token_verifier(&self) -> &UserInfoVerifier {
        &self.verifier
    }
}

impl DependOnClock for Handler {
    type Clock = SystemClock;
    fn clock(&self) -> &SystemClock {
        &self.wall_clock
    }
}
