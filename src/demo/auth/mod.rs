//! Authentication module: the signed-in user plus sign-in metadata.

pub mod metadata;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use self::metadata::{MetadataState, SET_LAST_SIGN_IN, SET_NUM_SIGN_INS};
use super::root::RootState;
use super::{DemoContext, DemoError, DemoStore, User};
use crate::compose::{compose, ComposedUnit};
use crate::error::CompositionError;
use crate::interface::{InterfaceCreator, InterfacePiece};
use crate::lens;
use crate::module::{ActionKind, Module, ModuleState};
use crate::store::Effect;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    pub metadata: MetadataState,
}

impl ModuleState for AuthState {}

pub const LOG_IN: ActionKind<User> = ActionKind::new("auth/log-in");
pub const LOG_OUT: ActionKind<()> = ActionKind::new("auth/log-out");

pub struct AuthModule;

impl Module for AuthModule {
    type State = AuthState;
    const NAME: &'static str = "auth";
    const ACTIONS: &'static [&'static str] = &[LOG_IN.kind(), LOG_OUT.kind()];
}

pub fn transitions() -> Result<ComposedUnit<AuthState>, CompositionError> {
    compose::<AuthModule>(AuthState::default())
        .on(LOG_IN, |state, user| AuthState {
            user: Some(user.clone()),
            ..state.clone()
        })
        .on(LOG_OUT, |state, _| AuthState {
            user: None,
            ..state.clone()
        })
        .child("metadata", metadata::transitions()?, lens!(AuthState, metadata))
        .build()
}

/// Sign in through the API, then record the sign-in in the metadata module.
pub fn sign_in(username: String) -> Effect<RootState, DemoContext, Result<User, DemoError>> {
    Effect::new(move |store: DemoStore| sign_in_with(store, username))
}

async fn sign_in_with(store: DemoStore, username: String) -> Result<User, DemoError> {
    let user = store.context().api.sign_in(&username).await?;
    store.dispatch(LOG_IN.create(user.clone()))?;
    store.dispatch(SET_LAST_SIGN_IN.create(now_millis()))?;

    let sign_ins = store.state().auth.metadata.num_sign_ins + 1;
    store.dispatch(SET_NUM_SIGN_INS.create(sign_ins))?;
    tracing::info!(username = %user.username, sign_ins, "signed in");
    Ok(user)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn interface() -> Result<InterfacePiece<RootState, AuthState, DemoContext>, CompositionError> {
    InterfaceCreator::<AuthModule, RootState, DemoContext>::new()
        .action_creator("log_in", |user: User| LOG_IN.create(user))
        .action_creator("log_out", |_: ()| LOG_OUT.create(()))
        .selector("get_user", |state: &AuthState| state.user.clone())
        .selector("is_signed_in", |state: &AuthState| state.user.is_some())
        .thunk("sign_in", sign_in)
        .child("metadata", metadata::interface()?, lens!(AuthState, metadata))
        .create_node()
}
