use serde::Serialize;

use crate::config::{NetworkKind, REWARDS_HOOK_ISSUER};
use crate::domain::{AccountIdentity, AccountSnapshot, ActionKind, Operation, SignRequest};

/// One button in the account's action bar, with the request it would sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferedAction {
    pub kind: ActionKind,
    pub enabled: bool,
    pub request: SignRequest,
}

/// Actions the viewer may take on the viewed account.
///
/// Nothing is offered for a blackholed account, or for someone else's account while signed in.
/// Anonymous viewers only get actions on accounts that are not a known service.
pub fn offered_actions(
    snapshot: &AccountSnapshot,
    identity: Option<&AccountIdentity>,
    network: NetworkKind,
) -> Vec<OfferedAction> {
    let active_address = identity.map(|i| i.address.as_str());
    let is_own = active_address == Some(snapshot.address.as_str());
    let visible = (active_address.is_none() && snapshot.service.is_none()) || is_own;
    if !visible || snapshot.is_blackholed() {
        return Vec::new();
    }

    let activated = snapshot.is_activated();
    let account = snapshot.address.clone();
    let ledger = snapshot.ledger_info.as_ref();
    let mut actions = Vec::new();

    if active_address.is_none() {
        actions.push(OfferedAction {
            kind: ActionKind::SignIn,
            enabled: true,
            request: SignRequest::sign_in(),
        });
    }

    if network.is_xahau() {
        let opted_in = ledger.is_some_and(|l| l.reward_lgr_first.is_some());
        let (kind, operation) = if opted_in {
            (
                ActionKind::RewardsOptOut,
                Operation::ClaimReward {
                    account: account.clone(),
                    issuer: None,
                    flags: Some(1),
                },
            )
        } else {
            (
                ActionKind::RewardsOptIn,
                Operation::ClaimReward {
                    account: account.clone(),
                    issuer: Some(REWARDS_HOOK_ISSUER.to_string()),
                    flags: None,
                },
            )
        };
        actions.push(one_off(kind, operation, false, is_own && activated));
    }

    if !network.is_devnet() {
        actions.push(one_off(
            ActionKind::SetAvatar,
            Operation::AccountSet {
                account: account.clone(),
            },
            true,
            is_own,
        ));
    }

    if ledger.is_none_or(|l| l.domain.is_none()) {
        actions.push(one_off(
            ActionKind::SetDomain,
            Operation::AccountSet {
                account: account.clone(),
            },
            false,
            is_own && activated,
        ));
    }

    if !network.is_xahau() && ledger.is_none_or(|l| l.did.is_none()) {
        actions.push(one_off(
            ActionKind::SetDid,
            Operation::DidSet { account },
            false,
            is_own && activated,
        ));
    }

    actions
}

fn one_off(
    kind: ActionKind,
    operation: Operation,
    sign_only: bool,
    enabled: bool,
) -> OfferedAction {
    OfferedAction {
        kind,
        enabled,
        request: SignRequest {
            action: Some(kind),
            operation: Some(operation),
            sign_only,
            redirect: None,
        },
    }
}
