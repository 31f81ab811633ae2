//! Configuration types for a paysettle engine instance.

use serde::{Deserialize, Serialize};

use crate::{Address, PaysettleError, Result};

/// Static configuration of one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Address under which the engine holds custody in the ledger.
    pub engine_address: Address,
    /// Initial administrator (withdrawal rights).
    pub admin: Address,
}

impl EngineConfig {
    #[must_use]
    pub fn new(engine_address: Address, admin: Address) -> Self {
        Self {
            engine_address,
            admin,
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| PaysettleError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.engine_address.is_zero() {
            return Err(PaysettleError::Configuration(
                "engine_address must not be zero".into(),
            ));
        }
        if self.engine_address == self.admin {
            return Err(PaysettleError::Configuration(
                "admin must differ from engine_address".into(),
            ));
        }
        if self.admin.is_zero() {
            return Err(PaysettleError::Configuration("admin must not be zero".into()));
        }
        Ok(())
    }
}

/// The administrator identity, as an explicit versioned value.
///
/// Exactly one administrator exists at any time. Handover is two-step: the
/// current administrator nominates a successor, who then claims the role.
/// Every change bumps `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub admin: Address,
    pub pending_admin: Option<Address>,
    pub version: u64,
}

impl AdminConfig {
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            pending_admin: None,
            version: 0,
        }
    }

    /// Fail with [`PaysettleError::Unauthorized`] unless `caller` is the administrator.
    pub fn ensure_admin(&self, caller: Address) -> Result<()> {
        if caller == self.admin {
            Ok(())
        } else {
            Err(PaysettleError::Unauthorized { caller })
        }
    }

    /// Nominate `new_admin` as successor. Only the administrator may call.
    pub fn request_transfer(&mut self, caller: Address, new_admin: Address) -> Result<()> {
        self.ensure_admin(caller)?;
        if new_admin.is_zero() {
            return Err(PaysettleError::invalid("new admin must not be the zero address"));
        }
        self.pending_admin = Some(new_admin);
        self.version += 1;
        Ok(())
    }

    /// Complete a handover. Only the pending administrator may call.
    /// Returns the previous administrator.
    pub fn claim(&mut self, caller: Address) -> Result<Address> {
        if self.pending_admin != Some(caller) {
            return Err(PaysettleError::Unauthorized { caller });
        }
        let previous = self.admin;
        self.admin = caller;
        self.pending_admin = None;
        self.version += 1;
        Ok(previous)
    }

    /// Hand over in one step. Returns the previous administrator.
    pub fn transfer_quickly(&mut self, caller: Address, new_admin: Address) -> Result<Address> {
        self.request_transfer(caller, new_admin)?;
        self.claim(new_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_json() {
        let json = format!(
            r#"{{"engine_address":"0x{}","admin":"0x{}"}}"#,
            "11".repeat(20),
            "22".repeat(20)
        );
        let cfg = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(cfg.engine_address, Address([0x11; 20]));
        assert_eq!(cfg.admin, Address([0x22; 20]));
    }

    #[test]
    fn config_rejects_zero_admin() {
        let cfg = EngineConfig::new(Address([1u8; 20]), Address::ZERO);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, PaysettleError::Configuration(_)));
    }

    #[test]
    fn config_rejects_bad_json() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().starts_with("PS_ERR_901"));
    }

    #[test]
    fn two_step_handover() {
        let admin = Address::random();
        let next = Address::random();
        let mut cfg = AdminConfig::new(admin);

        cfg.request_transfer(admin, next).unwrap();
        assert_eq!(cfg.pending_admin, Some(next));
        assert_eq!(cfg.admin, admin);

        let previous = cfg.claim(next).unwrap();
        assert_eq!(previous, admin);
        assert_eq!(cfg.admin, next);
        assert_eq!(cfg.pending_admin, None);
        assert_eq!(cfg.version, 2);
    }

    #[test]
    fn only_admin_may_nominate() {
        let mut cfg = AdminConfig::new(Address::random());
        let other = Address::random();
        let err = cfg.request_transfer(other, other).unwrap_err();
        assert_eq!(err, PaysettleError::Unauthorized { caller: other });
        assert_eq!(cfg.version, 0);
    }

    #[test]
    fn only_pending_may_claim() {
        let admin = Address::random();
        let mut cfg = AdminConfig::new(admin);
        cfg.request_transfer(admin, Address::random()).unwrap();
        assert!(cfg.claim(Address::random()).is_err());
        assert!(cfg.claim(admin).is_err());
    }

    #[test]
    fn quick_transfer_rejects_zero() {
        let admin = Address::random();
        let mut cfg = AdminConfig::new(admin);
        let err = cfg.transfer_quickly(admin, Address::ZERO).unwrap_err();
        assert!(matches!(err, PaysettleError::InvalidRequest { .. }));
        assert_eq!(cfg.admin, admin);
    }
}
