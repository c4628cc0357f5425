//! Interface builder.
//!
//! Each module declares its action creators, local selectors and thunks in
//! an [`InterfaceCreator`]; [`InterfaceCreator::create_node`] packages them
//! with the pieces of the module's children. [`complete`] then walks the
//! piece tree from the root, rewriting every selector to read the global
//! snapshot:
//!
//! ```text
//! root        slice = |g| g                       selectors: root, get_settings
//! ├── auth    slice = |g| &root(g).auth           selectors: root, get_user, ...
//! │   └── metadata  slice = |g| &auth(g).metadata selectors: root
//! └── todos   slice = |g| &root(g).todos          selectors: root, get_todos, ...
//! ```

mod entry;

use std::any::{type_name, Any};
use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use self::entry::Entry;
use crate::compose::Lens;
use crate::error::{check_module_key, CompositionError, LookupError, ROOT_SELECTOR};
use crate::module::{Action, Module, ModuleState};
use crate::store::Effect;

/// Projection of the global snapshot.
pub type Selector<G, R> = Arc<dyn Fn(&G) -> R + Send + Sync>;

/// Projection of the global snapshot onto one module's local slice.
pub type SliceSelector<G, L> = Arc<dyn for<'a> Fn(&'a G) -> &'a L + Send + Sync>;

/// Builds an action from arbitrary arguments.
pub type ActionCreator<A> = Arc<dyn Fn(A) -> Action + Send + Sync>;

/// Builds a side-effect procedure from arbitrary arguments.
pub type Thunk<A, G, C, R> = Arc<dyn Fn(A) -> Effect<G, C, R> + Send + Sync>;

const ACTION_CREATORS: &str = "action creators";
const SELECTORS: &str = "selectors";
const THUNKS: &str = "thunks";

/// Wrap a borrowing projection as a [`SliceSelector`].
pub fn slice_selector<G, L, F>(projection: F) -> SliceSelector<G, L>
where
    G: 'static,
    L: 'static,
    F: for<'a> Fn(&'a G) -> &'a L + Send + Sync + 'static,
{
    Arc::new(projection)
}

type CompleteSelector<G, L> = Box<dyn Fn(&SliceSelector<G, L>) -> Entry + Send + Sync>;

trait PendingChild<G, L, C>: Send + Sync {
    fn complete(
        &self,
        path: String,
        parent: &SliceSelector<G, L>,
    ) -> Result<InterfaceNode<G, C>, CompositionError>;
}

struct ChildPiece<G, L, K, C> {
    piece: InterfacePiece<G, K, C>,
    lens: Lens<L, K>,
}

impl<G, L, K, C> PendingChild<G, L, C> for ChildPiece<G, L, K, C>
where
    G: ModuleState,
    L: ModuleState,
    K: ModuleState,
    C: Send + Sync + 'static,
{
    fn complete(
        &self,
        path: String,
        parent: &SliceSelector<G, L>,
    ) -> Result<InterfaceNode<G, C>, CompositionError> {
        let parent = Arc::clone(parent);
        let lens = self.lens;
        let slice = slice_selector(move |global: &G| lens.get(parent(global)));
        complete_interface(path, slice, &self.piece)
    }
}

/// The declared interface of one module, not yet tied to the global state.
pub struct InterfacePiece<G, L, C = ()> {
    action_creators: IndexMap<&'static str, Entry>,
    selectors: IndexMap<&'static str, CompleteSelector<G, L>>,
    thunks: IndexMap<&'static str, Entry>,
    children: IndexMap<&'static str, Box<dyn PendingChild<G, L, C>>>,
}

/// Declares the interface of module `M` in a store whose global state is `G`
/// and whose effects receive context `C`.
pub struct InterfaceCreator<M: Module, G, C = ()> {
    piece: InterfacePiece<G, M::State, C>,
    error: Option<CompositionError>,
    _module: PhantomData<M>,
}

impl<M, G, C> Default for InterfaceCreator<M, G, C>
where
    M: Module,
    G: ModuleState,
    C: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M, G, C> InterfaceCreator<M, G, C>
where
    M: Module,
    G: ModuleState,
    C: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            piece: InterfacePiece {
                action_creators: IndexMap::new(),
                selectors: IndexMap::new(),
                thunks: IndexMap::new(),
                children: IndexMap::new(),
            },
            error: None,
            _module: PhantomData,
        }
    }

    /// Declare an action creator taking `A` (use `()` for none).
    pub fn action_creator<A, F>(mut self, name: &'static str, creator: F) -> Self
    where
        A: 'static,
        F: Fn(A) -> Action + Send + Sync + 'static,
    {
        if self.piece.action_creators.contains_key(name) {
            self.fail(duplicate(ACTION_CREATORS, name));
            return self;
        }
        let creator: ActionCreator<A> = Arc::new(creator);
        self.piece.action_creators.insert(name, Entry::new(creator));
        self
    }

    /// Declare a selector over the module's local state.
    ///
    /// The name `root` is reserved for the slice selector every node gets.
    pub fn selector<R, F>(mut self, name: &'static str, selector: F) -> Self
    where
        R: 'static,
        F: Fn(&M::State) -> R + Send + Sync + 'static,
    {
        if name == ROOT_SELECTOR {
            self.fail(CompositionError::ReservedSelectorName);
            return self;
        }
        if self.piece.selectors.contains_key(name) {
            self.fail(duplicate(SELECTORS, name));
            return self;
        }
        let local = Arc::new(selector);
        let rewrite: CompleteSelector<G, M::State> =
            Box::new(move |slice: &SliceSelector<G, M::State>| -> Entry {
                let slice = Arc::clone(slice);
                let local = Arc::clone(&local);
                let global: Selector<G, R> = Arc::new(move |state: &G| local(slice(state)));
                Entry::new(global)
            });
        self.piece.selectors.insert(name, rewrite);
        self
    }

    /// Declare a thunk: a factory for side-effect procedures.
    pub fn thunk<A, R, F>(mut self, name: &'static str, thunk: F) -> Self
    where
        A: 'static,
        R: 'static,
        F: Fn(A) -> Effect<G, C, R> + Send + Sync + 'static,
    {
        if self.piece.thunks.contains_key(name) {
            self.fail(duplicate(THUNKS, name));
            return self;
        }
        let thunk: Thunk<A, G, C, R> = Arc::new(thunk);
        self.piece.thunks.insert(name, Entry::new(thunk));
        self
    }

    /// Attach the piece of a child module stored under `key`.
    pub fn child<K: ModuleState>(
        mut self,
        key: &'static str,
        piece: InterfacePiece<G, K, C>,
        lens: Lens<M::State, K>,
    ) -> Self {
        if self.piece.children.contains_key(key) {
            self.fail(CompositionError::DuplicateModuleKey {
                key: key.to_string(),
            });
            return self;
        }
        self.piece
            .children
            .insert(key, Box::new(ChildPiece { piece, lens }));
        self
    }

    /// Package the declarations into a piece.
    ///
    /// Fails if any declaration was invalid (a selector named `root`, a
    /// duplicated name or child key).
    pub fn create_node(self) -> Result<InterfacePiece<G, M::State, C>, CompositionError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.piece),
        }
    }

    fn fail(&mut self, err: CompositionError) {
        self.error.get_or_insert(err);
    }
}

fn duplicate(section: &'static str, name: &str) -> CompositionError {
    CompositionError::DuplicateName {
        section,
        name: name.to_string(),
    }
}

/// Complete the interface tree rooted at `root`.
///
/// Fails if any child module, at any depth, is keyed `actions`, `thunks`
/// or `selectors`.
pub fn complete<G, C>(root: InterfacePiece<G, G, C>) -> Result<InterfaceNode<G, C>, CompositionError>
where
    G: ModuleState,
    C: Send + Sync + 'static,
{
    let node = complete_interface(String::new(), slice_selector(|state: &G| state), &root)?;
    debug!(modules = node.module_count(), "completed interface tree");
    Ok(node)
}

fn complete_interface<G, L, C>(
    path: String,
    slice: SliceSelector<G, L>,
    piece: &InterfacePiece<G, L, C>,
) -> Result<InterfaceNode<G, C>, CompositionError>
where
    G: ModuleState,
    L: ModuleState,
    C: Send + Sync + 'static,
{
    for key in piece.children.keys() {
        check_module_key(key)?;
    }

    let mut selectors = IndexMap::with_capacity(piece.selectors.len() + 1);
    let root_slice = Arc::clone(&slice);
    let root: Selector<G, L> = Arc::new(move |state: &G| root_slice(state).clone());
    selectors.insert(ROOT_SELECTOR, Entry::new(root));
    for (name, rewrite) in &piece.selectors {
        selectors.insert(*name, rewrite(&slice));
    }

    let mut children = IndexMap::with_capacity(piece.children.len());
    for (key, child) in &piece.children {
        let child_path = if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        };
        children.insert(*key, child.complete(child_path, &slice)?);
    }

    Ok(InterfaceNode {
        path,
        slice: Entry::new(slice),
        action_creators: piece.action_creators.clone(),
        selectors,
        thunks: piece.thunks.clone(),
        children,
        _types: PhantomData,
    })
}

/// A completed interface node.
///
/// Child nodes are addressed with the same keys as the state tree.
/// Entries are fetched with the signature they were declared with; asking
/// for another signature is a [`LookupError::TypeMismatch`].
pub struct InterfaceNode<G, C = ()> {
    path: String,
    slice: Entry,
    action_creators: IndexMap<&'static str, Entry>,
    selectors: IndexMap<&'static str, Entry>,
    thunks: IndexMap<&'static str, Entry>,
    children: IndexMap<&'static str, InterfaceNode<G, C>>,
    _types: PhantomData<fn() -> (G, C)>,
}

impl<G, C> InterfaceNode<G, C>
where
    G: ModuleState,
    C: Send + Sync + 'static,
{
    /// Dotted key path from the root (`"auth.metadata"`); `root` for the root.
    pub fn path(&self) -> &str {
        if self.path.is_empty() {
            ROOT_SELECTOR
        } else {
            &self.path
        }
    }

    pub fn child(&self, key: &str) -> Result<&Self, LookupError> {
        self.children
            .get(key)
            .ok_or_else(|| LookupError::MissingModule {
                path: self.path().to_string(),
                key: key.to_string(),
            })
    }

    /// Walk down the tree along `keys`.
    pub fn at(&self, keys: &[&str]) -> Result<&Self, LookupError> {
        keys.iter().try_fold(self, |node, key| node.child(key))
    }

    pub fn child_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.children.keys().copied()
    }

    /// Selector names, `root` first.
    pub fn selector_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.selectors.keys().copied()
    }

    pub fn action_creator_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.action_creators.keys().copied()
    }

    pub fn thunk_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.thunks.keys().copied()
    }

    /// Number of modules in this subtree, this one included.
    pub fn module_count(&self) -> usize {
        1 + self
            .children
            .values()
            .map(InterfaceNode::module_count)
            .sum::<usize>()
    }

    /// The borrowing projection onto this module's slice.
    pub fn root<L: 'static>(&self) -> Result<SliceSelector<G, L>, LookupError> {
        self.slice
            .downcast::<SliceSelector<G, L>>()
            .ok_or_else(|| LookupError::TypeMismatch {
                path: self.path().to_string(),
                section: SELECTORS,
                name: ROOT_SELECTOR.to_string(),
                expected: type_name::<SliceSelector<G, L>>(),
                found: self.slice.type_name(),
            })
    }

    /// A selector over the global snapshot. `root` returns a clone of the slice.
    pub fn selector<R: 'static>(&self, name: &str) -> Result<Selector<G, R>, LookupError> {
        self.lookup(SELECTORS, &self.selectors, name)
    }

    pub fn action_creator<A: 'static>(&self, name: &str) -> Result<ActionCreator<A>, LookupError> {
        self.lookup(ACTION_CREATORS, &self.action_creators, name)
    }

    pub fn thunk<A: 'static, R: 'static>(
        &self,
        name: &str,
    ) -> Result<Thunk<A, G, C, R>, LookupError> {
        self.lookup(THUNKS, &self.thunks, name)
    }

    fn lookup<T: Any + Clone>(
        &self,
        section: &'static str,
        entries: &IndexMap<&'static str, Entry>,
        name: &str,
    ) -> Result<T, LookupError> {
        let entry = entries.get(name).ok_or_else(|| LookupError::MissingEntry {
            path: self.path().to_string(),
            section,
            name: name.to_string(),
        })?;
        entry.downcast::<T>().ok_or_else(|| LookupError::TypeMismatch {
            path: self.path().to_string(),
            section,
            name: name.to_string(),
            expected: type_name::<T>(),
            found: entry.type_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens;
    use crate::module::ActionKind;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Leaf {
        count: u32,
    }
    impl ModuleState for Leaf {}

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Top {
        label: String,
        leaf: Leaf,
    }
    impl ModuleState for Top {}

    const BUMP: ActionKind<u32> = ActionKind::new("leaf/bump");

    struct LeafModule;
    impl Module for LeafModule {
        type State = Leaf;
        const NAME: &'static str = "leaf";
        const ACTIONS: &'static [&'static str] = &[BUMP.kind()];
    }

    struct TopModule;
    impl Module for TopModule {
        type State = Top;
        const NAME: &'static str = "top";
        const ACTIONS: &'static [&'static str] = &[];
    }

    fn leaf_piece() -> InterfacePiece<Top, Leaf> {
        InterfaceCreator::<LeafModule, Top>::new()
            .action_creator("bump", |by: u32| BUMP.create(by))
            .selector("doubled", |leaf: &Leaf| leaf.count * 2)
            .create_node()
            .unwrap()
    }

    fn tree() -> InterfaceNode<Top> {
        let top = InterfaceCreator::<TopModule, Top>::new()
            .selector("label_len", |top: &Top| top.label.len())
            .child("leaf", leaf_piece(), lens!(Top, leaf))
            .create_node()
            .unwrap();
        complete(top).unwrap()
    }

    fn snapshot() -> Top {
        Top {
            label: "four".to_string(),
            leaf: Leaf { count: 21 },
        }
    }

    #[test]
    fn selectors_read_the_global_snapshot() {
        let tree = tree();
        let state = snapshot();

        let label_len = tree.selector::<usize>("label_len").unwrap();
        assert_eq!(label_len(&state), 4);

        let doubled = tree.child("leaf").unwrap().selector::<u32>("doubled").unwrap();
        assert_eq!(doubled(&state), 42);
    }

    #[test]
    fn root_selector_projects_the_slice() {
        let tree = tree();
        let state = snapshot();

        let leaf = tree.at(&["leaf"]).unwrap();
        let slice = leaf.root::<Leaf>().unwrap();
        assert_eq!(slice(&state), &state.leaf);

        let owned = leaf.selector::<Leaf>("root").unwrap();
        assert_eq!(owned(&state), state.leaf);

        let whole = tree.root::<Top>().unwrap();
        assert_eq!(whole(&state), &state);
        assert_eq!(
            tree.selector_names().collect::<Vec<_>>(),
            vec!["root", "label_len"]
        );
    }

    #[test]
    fn action_creators_pass_through_untouched() {
        let tree = tree();
        let bump = tree.child("leaf").unwrap().action_creator::<u32>("bump").unwrap();
        let action = bump(3);
        assert_eq!(action.kind(), "leaf/bump");
        assert_eq!(action.payload::<u32>(), Some(&3));
    }

    #[test]
    fn selector_named_root_is_rejected() {
        let result = InterfaceCreator::<LeafModule, Top>::new()
            .selector("root", |leaf: &Leaf| leaf.count)
            .create_node();
        assert_eq!(result.err(), Some(CompositionError::ReservedSelectorName));
    }

    #[test]
    fn lookups_report_missing_and_mistyped_entries() {
        let tree = tree();
        assert!(matches!(
            tree.child("nope"),
            Err(LookupError::MissingModule { ref key, .. }) if key == "nope"
        ));
        assert!(matches!(
            tree.selector::<usize>("missing"),
            Err(LookupError::MissingEntry { .. })
        ));
        assert!(matches!(
            tree.selector::<String>("label_len"),
            Err(LookupError::TypeMismatch { .. })
        ));
        assert_eq!(tree.child("leaf").unwrap().path(), "leaf");
        assert_eq!(tree.path(), "root");
        assert_eq!(tree.module_count(), 2);
    }
}
