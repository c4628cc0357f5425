//! Todo list module.

use serde::Serialize;

use super::root::RootState;
use super::{DemoContext, DemoError, DemoStore, Todo};
use crate::compose::{compose, ComposedUnit};
use crate::error::CompositionError;
use crate::interface::{InterfaceCreator, InterfacePiece};
use crate::module::{ActionKind, Module, ModuleState};
use crate::store::Effect;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TodoState {
    pub todos: Vec<Todo>,
    pub active: Option<Todo>,
}

impl ModuleState for TodoState {}

pub const SET_TODOS: ActionKind<Vec<Todo>> = ActionKind::new("todos/set-todos");
pub const ADD_TODO: ActionKind<Todo> = ActionKind::new("todos/add-todo");
pub const CLEAR_TODOS: ActionKind<()> = ActionKind::new("todos/clear-todos");
pub const SET_ACTIVE_TODO: ActionKind<Todo> = ActionKind::new("todos/set-active");
pub const CLEAR_ACTIVE_TODO: ActionKind<()> = ActionKind::new("todos/clear-active");

pub struct TodoModule;

impl Module for TodoModule {
    type State = TodoState;
    const NAME: &'static str = "todos";
    const ACTIONS: &'static [&'static str] = &[
        SET_TODOS.kind(),
        ADD_TODO.kind(),
        CLEAR_TODOS.kind(),
        SET_ACTIVE_TODO.kind(),
        CLEAR_ACTIVE_TODO.kind(),
    ];
}

pub fn transitions() -> Result<ComposedUnit<TodoState>, CompositionError> {
    compose::<TodoModule>(TodoState::default())
        .on(SET_TODOS, |state, todos| TodoState {
            todos: todos.clone(),
            ..state.clone()
        })
        .on(ADD_TODO, |state, todo| {
            let mut todos = state.todos.clone();
            todos.push(todo.clone());
            TodoState {
                todos,
                ..state.clone()
            }
        })
        .on(CLEAR_TODOS, |state, _| TodoState {
            todos: Vec::new(),
            ..state.clone()
        })
        .on(SET_ACTIVE_TODO, |state, todo| TodoState {
            active: Some(todo.clone()),
            ..state.clone()
        })
        .on(CLEAR_ACTIVE_TODO, |state, _| TodoState {
            active: None,
            ..state.clone()
        })
        .build()
}

/// Fetch the todo list from the API and store it. Resolves to the list.
pub fn fetch_todos(_: ()) -> Effect<RootState, DemoContext, Result<Vec<Todo>, DemoError>> {
    Effect::new(fetch_todos_with)
}

async fn fetch_todos_with(store: DemoStore) -> Result<Vec<Todo>, DemoError> {
    let todos = store.context().api.get_todos().await?;
    store.dispatch(SET_TODOS.create(todos.clone()))?;
    Ok(todos)
}

pub fn interface() -> Result<InterfacePiece<RootState, TodoState, DemoContext>, CompositionError> {
    InterfaceCreator::<TodoModule, RootState, DemoContext>::new()
        .action_creator("add_todo", |todo: Todo| ADD_TODO.create(todo))
        .action_creator("set_todos", |todos: Vec<Todo>| SET_TODOS.create(todos))
        .action_creator("clear_todos", |_: ()| CLEAR_TODOS.create(()))
        .action_creator("set_active_todo", |todo: Todo| SET_ACTIVE_TODO.create(todo))
        .action_creator("clear_active_todo", |_: ()| CLEAR_ACTIVE_TODO.create(()))
        .selector("get_todos", |state: &TodoState| state.todos.clone())
        .selector("get_active", |state: &TodoState| state.active.clone())
        .selector("completed_count", |state: &TodoState| {
            state.todos.iter().filter(|todo| todo.completed).count()
        })
        .thunk("fetch_todos", fetch_todos)
        .create_node()
}
