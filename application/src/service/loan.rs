use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnItemQuery, DependOnLoanQuery, ItemQuery, LoanQuery};
use kernel::interface::update::{
    DependOnItemModifier, DependOnLoanModifier, ItemModifier, LoanModifier,
};
use kernel::prelude::entity::{ItemId, Loan, LoanId, Principal, Quantity, ReturnedAt};
use kernel::{fail, KernelError};

use crate::transfer::{CreateLoanDto, LoanDto, ReturnLoanDto};

#[async_trait::async_trait]
pub trait GetLoanService: 'static + Sync + Send + DependOnLoanQuery {
    /// Every active loan for admins, the caller's own otherwise.
    async fn get_active_loans(
        &self,
        principal: &Principal,
    ) -> error_stack::Result<Vec<LoanDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let loans = if principal.is_admin() {
            self.loan_query().find_active(&mut connection).await?
        } else {
            self.loan_query()
                .find_active_by_borrower(&mut connection, principal.id())
                .await?
        };
        Ok(loans.into_iter().map(LoanDto::from).collect())
    }
}

impl<T> GetLoanService for T where T: DependOnLoanQuery {}

#[async_trait::async_trait]
pub trait LendItemService:
    'static
    + Sync
    + Send
    + DependOnItemQuery
    + DependOnItemModifier
    + DependOnLoanModifier
    + DependOnClock
{
    /// Decrements availability and records the loan in one transaction. Concurrent
    /// loans of the same item never drive availability below zero.
    async fn lend_item(
        &self,
        principal: &Principal,
        dto: CreateLoanDto,
    ) -> error_stack::Result<LoanDto, KernelError> {
        let quantity = Quantity::positive(dto.quantity)?;
        let now = self.clock().now();
        if dto.expected_return_at <= now {
            return Err(fail(
                KernelError::Validation,
                "Expected return must be in the future",
            ));
        }
        let item_id = ItemId::new(dto.item_id);

        let mut connection = self.database_connection().transact().await?;
        let Some(item) = self
            .item_modifier()
            .take(&mut connection, &item_id, &quantity)
            .await?
        else {
            let item = self
                .item_query()
                .find_by_id(&mut connection, &item_id)
                .await?
                .ok_or_else(|| fail(KernelError::NotFound, "Item not found"))?;
            return Err(fail(
                KernelError::InsufficientQuantity,
                format!(
                    "Only {} of {} available",
                    item.available().as_ref(),
                    item.name().as_ref()
                ),
            ));
        };

        let loan = Loan::new(
            LoanId::generate(),
            item_id,
            item.name().clone(),
            quantity,
            principal.identity().clone(),
            now,
            dto.expected_return_at,
            None,
        );
        self.loan_modifier().create(&mut connection, &loan).await?;
        connection.commit().await?;

        tracing::info!(
            "Loan {} of {} x{} to {}",
            loan.id().as_ref(),
            loan.item_id().as_ref(),
            loan.quantity().as_ref(),
            principal.id().as_ref()
        );
        Ok(LoanDto::from(loan))
    }
}

impl<T> LendItemService for T where
    T: DependOnItemQuery + DependOnItemModifier + DependOnLoanModifier + DependOnClock
{
}

#[async_trait::async_trait]
pub trait ReturnLoanService:
    'static
    + Sync
    + Send
    + DependOnLoanQuery
    + DependOnLoanModifier
    + DependOnItemModifier
    + DependOnClock
{
    async fn return_loan(
        &self,
        principal: &Principal,
        dto: ReturnLoanDto,
    ) -> error_stack::Result<LoanDto, KernelError> {
        let id = LoanId::new(dto.id);
        let mut connection = self.database_connection().transact().await?;
        let loan = self
            .loan_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| fail(KernelError::NotFound, "Loan not found"))?;
        principal.ensure_owner_or_admin(Some(loan.borrower().id()))?;

        let returned_at = ReturnedAt::new(self.clock().now());
        let closed = self
            .loan_modifier()
            .close(&mut connection, &id, &returned_at)
            .await?
            .ok_or_else(|| fail(KernelError::InvalidTransition, "Loan was already returned"))?;
        self.item_modifier()
            .restore(&mut connection, closed.item_id(), closed.quantity())
            .await?
            .ok_or_else(|| {
                fail(
                    KernelError::Internal,
                    format!(
                        "Returning loan {} would exceed the stock of {}",
                        id.as_ref(),
                        closed.item_id().as_ref()
                    ),
                )
            })?;
        connection.commit().await?;

        tracing::info!("Loan {} returned", id.as_ref());
        Ok(LoanDto::from(closed))
    }
}

impl<T> ReturnLoanService for T where
    T: DependOnLoanQuery + DependOnLoanModifier + DependOnItemModifier + DependOnClock
{
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use time::Duration;
    use uuid::Uuid;

    use kernel::KernelError;

    use crate::service::{GetItemService, GetLoanService, LendItemService, ReturnLoanService};
    use crate::testing::{admin, member, TestModule};
    use crate::transfer::{CreateLoanDto, ReturnLoanDto};

    fn borrow(module: &TestModule, item_id: &str, quantity: i32) -> CreateLoanDto {
        CreateLoanDto {
            item_id: item_id.to_string(),
            quantity,
            expected_return_at: module.now() + Duration::days(3),
        }
    }

    async fn available(module: &TestModule, item_id: &str) -> i32 {
        module
            .get_items()
            .await
            .unwrap()
            .into_iter()
            .find(|item| item.id == item_id)
            .unwrap()
            .available_quantity
    }

    // Only exercises the in-memory store; the row guard is covered by
    // `concurrent_takes_never_oversell` in the driver.
    #[tokio::test]
    async fn last_unit_goes_to_one_borrower_in_memory_store() {
        let module = Arc::new(TestModule::new());
        let alice = member("alice");
        let bob = member("bob");

        let (first, second) = tokio::join!(
            module.lend_item(&alice, borrow(&module, "projector", 1)),
            module.lend_item(&bob, borrow(&module, "projector", 1)),
        );
        let results = [first, second];
        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        let err = results
            .iter()
            .find_map(|result| result.as_ref().err())
            .unwrap();
        assert_eq!(*err.current_context(), KernelError::InsufficientQuantity);

        assert_eq!(available(&module, "projector").await, 0);
        assert_eq!(module.get_active_loans(&admin()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn loan_and_return_round_trip() {
        let module = TestModule::new();
        let alice = member("alice");

        let loan = module
            .lend_item(&alice, borrow(&module, "lap-recorder", 2))
            .await
            .unwrap();
        assert_eq!(loan.item_name, "Lap Recorder");
        assert_eq!(loan.loaned_at, module.now());
        assert_eq!(available(&module, "lap-recorder").await, 0);
        assert_eq!(module.get_active_loans(&alice).await.unwrap().len(), 1);
        assert!(module
            .get_active_loans(&member("bob"))
            .await
            .unwrap()
            .is_empty());

        let err = module
            .return_loan(&member("bob"), ReturnLoanDto { id: loan.id })
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Forbidden);

        let returned = module
            .return_loan(&alice, ReturnLoanDto { id: loan.id })
            .await
            .unwrap();
        assert_eq!(returned.returned_at, Some(module.now()));
        assert_eq!(available(&module, "lap-recorder").await, 2);
        assert!(module.get_active_loans(&alice).await.unwrap().is_empty());

        let err = module
            .return_loan(&admin(), ReturnLoanDto { id: loan.id })
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::InvalidTransition);
        assert_eq!(available(&module, "lap-recorder").await, 2);
    }

    #[tokio::test]
    async fn invalid_loans_leave_stock_untouched() {
        let module = TestModule::new();
        let alice = member("alice");

        for quantity in [0, -1] {
            let err = module
                .lend_item(&alice, borrow(&module, "projector", quantity))
                .await
                .unwrap_err();
            assert_eq!(*err.current_context(), KernelError::Validation);
        }

        let err = module
            .lend_item(&alice, borrow(&module, "projector", 2))
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::InsufficientQuantity);

        let err = module
            .lend_item(&alice, borrow(&module, "time-machine", 1))
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::NotFound);

        let mut past = borrow(&module, "projector", 1);
        past.expected_return_at = module.now() - Duration::hours(1);
        let err = module.lend_item(&alice, past).await.unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Validation);

        let err = module
            .return_loan(&alice, ReturnLoanDto { id: Uuid::new_v4() })
            .await
            .unwrap_err();
        assert_eq!(*err.current_context(), KernelError::NotFound);

        assert_eq!(available(&module, "projector").await, 1);
        assert!(module.get_active_loans(&admin()).await.unwrap().is_empty());
    }
}
