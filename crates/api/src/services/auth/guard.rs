//! Guard chain: ordered authorization steps evaluated before a handler.

use super::{AuthError, RoleGate, TokenService, VerifiedIdentity};
use crate::models::User;

/// One authorization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Run the Credential Verifier on the `Authorization` header.
    VerifyToken,
    /// Run the Role Gate on the identity decoded by an earlier step.
    RequireAdmin,
}

/// What a chain established about the caller.
#[derive(Debug, Clone, Default)]
pub struct Passage {
    /// Set once a `VerifyToken` step has run.
    pub identity: Option<VerifiedIdentity>,
    /// Set once a `RequireAdmin` step has run.
    pub admin: Option<User>,
}

/// An explicit, ordered list of guards.
///
/// Steps run in order and the first failure is terminal. The order is part
/// of the contract: `RequireAdmin` with no identity from an earlier
/// `VerifyToken` fails closed with `Unauthorized` and never touches the
/// identity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardChain {
    steps: &'static [Guard],
}

impl GuardChain {
    /// Verifier only.
    pub const AUTHENTICATED: Self = Self::new(&[Guard::VerifyToken]);

    /// Verifier, then Gate.
    pub const ADMIN: Self = Self::new(&[Guard::VerifyToken, Guard::RequireAdmin]);

    /// Build a chain from explicit steps.
    #[must_use]
    pub const fn new(steps: &'static [Guard]) -> Self {
        Self { steps }
    }

    /// The steps, in evaluation order.
    #[must_use]
    pub const fn steps(&self) -> &'static [Guard] {
        self.steps
    }

    /// Evaluate every step against the raw `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns the first step's rejection: `AuthError::Unauthorized` for a
    /// failed or missing verification, `AuthError::Forbidden` from the gate,
    /// or `AuthError::Repository` if the role lookup fails.
    pub async fn evaluate(
        &self,
        authorization: Option<&str>,
        tokens: &TokenService,
        gate: &RoleGate,
    ) -> Result<Passage, AuthError> {
        let mut passage = Passage::default();

        for step in self.steps {
            match step {
                Guard::VerifyToken => {
                    passage.identity = Some(tokens.verify_header(authorization)?);
                }
                Guard::RequireAdmin => {
                    let identity = passage.identity.as_ref().ok_or(AuthError::Unauthorized)?;
                    passage.admin = Some(gate.require_admin(identity).await?);
                }
            }
        }

        Ok(passage)
    }
}
