//! Treasury and access control.
//!
//! Only the administrator may move funds out of engine custody. The engine
//! only holds value transiently during a settlement, so anything found here
//! between calls is stranded (direct deposits, dust) and recoverable by the
//! administrator alone.

use std::sync::{PoisonError, RwLock};

use paysettle_ledger::{asset_ops, Ledger};
use paysettle_types::{amount, Address, AdminConfig, AssetId, EngineEvent, PaysettleError, Result};
use rust_decimal::Decimal;

/// Administrator-gated withdrawals and administrator handover.
#[derive(Debug)]
pub struct Treasury {
    /// Address whose custody the treasury controls.
    custodian: Address,
    admin: RwLock<AdminConfig>,
}

impl Treasury {
    #[must_use]
    pub fn new(custodian: Address, admin: Address) -> Self {
        Self {
            custodian,
            admin: RwLock::new(AdminConfig::new(admin)),
        }
    }

    /// Current administrator.
    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin_config().admin
    }

    /// Snapshot of the versioned administrator value.
    #[must_use]
    pub fn admin_config(&self) -> AdminConfig {
        self.admin
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Move native funds from custody to `to`.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the administrator
    /// - `InsufficientFunds` if custody holds less than `amount`
    pub fn withdraw_native(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount: Decimal,
        to: Address,
    ) -> Result<()> {
        self.withdraw(ledger, caller, AssetId::Native, amount, to)?;
        ledger.emit(self.custodian, EngineEvent::NativeWithdraw { amount, to });
        Ok(())
    }

    /// Move `token` funds from custody to `to`.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the administrator
    /// - `InsufficientFunds` if custody holds less than `amount`
    /// - `UnknownToken` if no token is deployed at `token`
    pub fn withdraw_token(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token: Address,
        amount: Decimal,
        to: Address,
    ) -> Result<()> {
        self.withdraw(ledger, caller, AssetId::Token(token), amount, to)?;
        ledger.emit(self.custodian, EngineEvent::TokenWithdraw { token, amount, to });
        Ok(())
    }

    fn withdraw(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        asset: AssetId,
        amount: Decimal,
        to: Address,
    ) -> Result<()> {
        if let Err(err) = self.admin_config().ensure_admin(caller) {
            tracing::warn!(caller = %caller, %asset, "Withdrawal refused: not admin");
            return Err(err);
        }
        amount::ensure_non_negative("amount", amount)?;
        if to.is_zero() {
            return Err(PaysettleError::invalid("withdrawal to the zero address"));
        }
        asset_ops(asset).transfer(ledger, self.custodian, to, amount)?;
        tracing::info!(%asset, %amount, to = %to, "Treasury withdrawal");
        Ok(())
    }

    /// Nominate a successor administrator.
    pub fn transfer_admin(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        new_admin: Address,
    ) -> Result<()> {
        self.admin
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .request_transfer(caller, new_admin)?;
        ledger.emit(
            self.custodian,
            EngineEvent::AdminTransferRequested {
                pending_admin: new_admin,
            },
        );
        tracing::info!(pending_admin = %new_admin, "Admin transfer requested");
        Ok(())
    }

    /// Complete a handover; `caller` must be the nominated successor.
    pub fn claim_admin(&self, ledger: &mut Ledger, caller: Address) -> Result<()> {
        let previous_admin = self
            .admin
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .claim(caller)?;
        ledger.emit(
            self.custodian,
            EngineEvent::AdminClaimed {
                new_admin: caller,
                previous_admin,
            },
        );
        tracing::info!(new_admin = %caller, previous_admin = %previous_admin, "Admin claimed");
        Ok(())
    }

    /// Nominate and install a successor in one step.
    pub fn transfer_admin_quickly(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        new_admin: Address,
    ) -> Result<()> {
        let previous_admin = self
            .admin
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .transfer_quickly(caller, new_admin)?;
        ledger.emit(
            self.custodian,
            EngineEvent::AdminTransferRequested {
                pending_admin: new_admin,
            },
        );
        ledger.emit(
            self.custodian,
            EngineEvent::AdminClaimed {
                new_admin,
                previous_admin,
            },
        );
        tracing::info!(new_admin = %new_admin, previous_admin = %previous_admin, "Admin replaced");
        Ok(())
    }
}
