//! Sign-in bookkeeping, nested under the auth module.

use serde::Serialize;

use crate::compose::{compose, ComposedUnit};
use crate::demo::{DemoContext, RootState};
use crate::error::CompositionError;
use crate::interface::{InterfaceCreator, InterfacePiece};
use crate::module::{ActionKind, Module, ModuleState};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MetadataState {
    /// Milliseconds since the Unix epoch.
    pub last_sign_in: Option<u64>,
    pub num_sign_ins: u32,
}

impl ModuleState for MetadataState {}

pub const SET_LAST_SIGN_IN: ActionKind<u64> = ActionKind::new("auth/metadata/set-last-sign-in");
pub const SET_NUM_SIGN_INS: ActionKind<u32> = ActionKind::new("auth/metadata/set-num-sign-ins");

pub struct MetadataModule;

impl Module for MetadataModule {
    type State = MetadataState;
    const NAME: &'static str = "auth/metadata";
    const ACTIONS: &'static [&'static str] = &[SET_LAST_SIGN_IN.kind(), SET_NUM_SIGN_INS.kind()];
}

pub fn transitions() -> Result<ComposedUnit<MetadataState>, CompositionError> {
    compose::<MetadataModule>(MetadataState::default())
        .on(SET_LAST_SIGN_IN, |state, at| MetadataState {
            last_sign_in: Some(*at),
            ..state.clone()
        })
        .on(SET_NUM_SIGN_INS, |state, count| MetadataState {
            num_sign_ins: *count,
            ..state.clone()
        })
        .build()
}

pub fn interface() -> Result<InterfacePiece<RootState, MetadataState, DemoContext>, CompositionError>
{
    InterfaceCreator::<MetadataModule, RootState, DemoContext>::new()
        .action_creator("set_last_sign_in", |at: u64| SET_LAST_SIGN_IN.create(at))
        .action_creator("set_num_sign_ins", |count: u32| SET_NUM_SIGN_INS.create(count))
        .create_node()
}
