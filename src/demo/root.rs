//! Root module: global settings plus the auth and todo modules.

use serde::{Deserialize, Serialize};

use super::auth::{self, AuthState};
use super::todos::{self, TodoState};
use super::DemoContext;
use crate::compose::{compose, ComposedUnit};
use crate::error::CompositionError;
use crate::interface::{InterfaceCreator, InterfacePiece};
use crate::lens;
use crate::module::{ActionKind, Module, ModuleState};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub is_browser: bool,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootState {
    pub settings: Settings,
    pub auth: AuthState,
    pub todos: TodoState,
}

impl ModuleState for RootState {}

pub const SET_IS_BROWSER: ActionKind<bool> = ActionKind::new("set-is-browser");
pub const SET_THEME: ActionKind<Theme> = ActionKind::new("set-theme");

pub struct RootModule;

impl Module for RootModule {
    type State = RootState;
    const NAME: &'static str = "root";
    const ACTIONS: &'static [&'static str] = &[SET_IS_BROWSER.kind(), SET_THEME.kind()];
}

pub fn transitions() -> Result<ComposedUnit<RootState>, CompositionError> {
    let seed = RootState {
        settings: Settings {
            is_browser: true,
            theme: Theme::Light,
        },
        auth: AuthState::default(),
        todos: TodoState::default(),
    };
    compose::<RootModule>(seed)
        .on(SET_THEME, |state, theme| RootState {
            settings: Settings {
                theme: *theme,
                ..state.settings
            },
            ..state.clone()
        })
        .on(SET_IS_BROWSER, |state, is_browser| RootState {
            settings: Settings {
                is_browser: *is_browser,
                ..state.settings
            },
            ..state.clone()
        })
        .child("auth", auth::transitions()?, lens!(RootState, auth))
        .child("todos", todos::transitions()?, lens!(RootState, todos))
        .build()
}

pub fn interface() -> Result<InterfacePiece<RootState, RootState, DemoContext>, CompositionError> {
    InterfaceCreator::<RootModule, RootState, DemoContext>::new()
        .action_creator("set_is_browser", |value: bool| SET_IS_BROWSER.create(value))
        .action_creator("set_theme", |theme: Theme| SET_THEME.create(theme))
        .selector("get_settings", |state: &RootState| state.settings)
        .child("auth", auth::interface()?, lens!(RootState, auth))
        .child("todos", todos::interface()?, lens!(RootState, todos))
        .create_node()
}
