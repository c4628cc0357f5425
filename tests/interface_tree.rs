//! Interface tree construction and selector rewriting.

use dunk::interface::{complete, InterfaceCreator, InterfacePiece};
use dunk::store::Effect;
use dunk::{lens, ActionKind, CompositionError, LookupError, Module, ModuleState};

#[derive(Debug, Clone, PartialEq, Default)]
struct Leaf {
    n: u32,
}
impl ModuleState for Leaf {}

#[derive(Debug, Clone, PartialEq, Default)]
struct Branch {
    name: String,
    leaf: Leaf,
}
impl ModuleState for Branch {}

#[derive(Debug, Clone, PartialEq, Default)]
struct Global {
    flag: bool,
    branch: Branch,
    other: Leaf,
}
impl ModuleState for Global {}

const SET_N: ActionKind<u32> = ActionKind::new("leaf/set-n");

macro_rules! module {
    ($name:ident, $state:ty) => {
        struct $name;
        impl Module for $name {
            type State = $state;
            const NAME: &'static str = stringify!($name);
            const ACTIONS: &'static [&'static str] = &[];
        }
    };
}

module!(LeafModule, Leaf);
module!(BranchModule, Branch);
module!(GlobalModule, Global);

fn leaf_piece() -> InterfacePiece<Global, Leaf> {
    InterfaceCreator::<LeafModule, Global>::new()
        .action_creator("set_n", |n: u32| SET_N.create(n))
        .selector("doubled", |leaf: &Leaf| leaf.n * 2)
        .create_node()
        .unwrap()
}

fn global_piece() -> InterfacePiece<Global, Global> {
    let branch = InterfaceCreator::<BranchModule, Global>::new()
        .selector("name_len", |branch: &Branch| branch.name.len())
        .child("leaf", leaf_piece(), lens!(Branch, leaf))
        .create_node()
        .unwrap();
    InterfaceCreator::<GlobalModule, Global>::new()
        .selector("flag", |global: &Global| global.flag)
        .thunk("noop", |_: ()| {
            Effect::new(|_store: dunk::Store<Global>| async { 7_u8 })
        })
        .child("branch", branch, lens!(Global, branch))
        .child("other", leaf_piece(), lens!(Global, other))
        .create_node()
        .unwrap()
}

fn sample() -> Global {
    Global {
        flag: true,
        branch: Branch {
            name: "branch".to_string(),
            leaf: Leaf { n: 3 },
        },
        other: Leaf { n: 11 },
    }
}

/// Every module gets exactly one node, at the same key path as its state.
#[test]
fn tree_mirrors_state_shape() {
    let root = complete(global_piece()).unwrap();
    assert_eq!(root.module_count(), 4);
    assert_eq!(root.child_keys().collect::<Vec<_>>(), vec!["branch", "other"]);
    assert_eq!(root.at(&["branch"]).unwrap().child_keys().count(), 1);

    let leaf = root.at(&["branch", "leaf"]).unwrap();
    assert_eq!(leaf.path(), "branch.leaf");
    assert_eq!(root.path(), "root");
}

/// `root` returns the local slice at the node's key path.
#[test]
fn root_selector_returns_local_slice() {
    let root = complete(global_piece()).unwrap();
    let global = sample();

    let whole = root.selector::<Global>("root").unwrap();
    assert_eq!(whole(&global), global);

    let leaf = root.at(&["branch", "leaf"]).unwrap();
    assert_eq!(leaf.selector::<Leaf>("root").unwrap()(&global), Leaf { n: 3 });

    let borrowed = leaf.root::<Leaf>().unwrap();
    assert!(std::ptr::eq(borrowed(&global), &global.branch.leaf));

    let other = root.child("other").unwrap();
    assert_eq!(other.selector::<Leaf>("root").unwrap()(&global), Leaf { n: 11 });
}

/// A completed selector equals the local selector applied at its path.
#[test]
fn selectors_are_rewritten_against_global_state() {
    let root = complete(global_piece()).unwrap();
    let global = sample();

    let doubled = root
        .at(&["branch", "leaf"])
        .unwrap()
        .selector::<u32>("doubled")
        .unwrap();
    assert_eq!(doubled(&global), 6);

    let other_doubled = root.child("other").unwrap().selector::<u32>("doubled").unwrap();
    assert_eq!(other_doubled(&global), 22);

    let name_len = root.child("branch").unwrap().selector::<usize>("name_len").unwrap();
    assert_eq!(name_len(&global), 6);

    assert!(root.selector::<bool>("flag").unwrap()(&global));
}

#[test]
fn root_selector_is_listed_first() {
    let root = complete(global_piece()).unwrap();
    let leaf = root.at(&["branch", "leaf"]).unwrap();
    assert_eq!(leaf.selector_names().collect::<Vec<_>>(), vec!["root", "doubled"]);
    assert_eq!(leaf.action_creator_names().collect::<Vec<_>>(), vec!["set_n"]);
    assert_eq!(root.thunk_names().collect::<Vec<_>>(), vec!["noop"]);
}

#[test]
fn action_creators_build_actions() {
    let root = complete(global_piece()).unwrap();
    let set_n = root
        .at(&["other"])
        .unwrap()
        .action_creator::<u32>("set_n")
        .unwrap();
    let action = set_n(4);
    assert_eq!(action.kind(), "leaf/set-n");
    assert_eq!(action.payload::<u32>(), Some(&4));
}

#[tokio::test]
async fn thunks_are_fetched_with_their_signature() {
    let root = complete(global_piece()).unwrap();
    let store = dunk::create_store(
        dunk::compose::<GlobalModule>(Global::default())
            .build()
            .unwrap(),
    );
    let noop = root.thunk::<(), u8>("noop").unwrap();
    assert_eq!(store.run(noop(())).await, 7);
}

#[test]
fn selector_named_root_is_rejected() {
    let result = InterfaceCreator::<LeafModule, Global>::new()
        .selector("root", |leaf: &Leaf| leaf.n)
        .create_node();
    assert_eq!(result.err(), Some(CompositionError::ReservedSelectorName));
}

#[test]
fn reserved_child_key_is_rejected_on_completion() {
    for key in ["actions", "thunks", "selectors"] {
        let piece = InterfaceCreator::<GlobalModule, Global>::new()
            .child(key, leaf_piece(), lens!(Global, other))
            .create_node()
            .unwrap();
        assert_eq!(
            complete(piece).err(),
            Some(CompositionError::ReservedModuleKey {
                key: key.to_string()
            })
        );
    }
}

/// Reserved keys deep in the tree fail the whole completion.
#[test]
fn nested_reserved_key_is_rejected() {
    let branch = InterfaceCreator::<BranchModule, Global>::new()
        .child("selectors", leaf_piece(), lens!(Branch, leaf))
        .create_node()
        .unwrap();
    let piece = InterfaceCreator::<GlobalModule, Global>::new()
        .child("branch", branch, lens!(Global, branch))
        .create_node()
        .unwrap();
    assert!(matches!(
        complete(piece),
        Err(CompositionError::ReservedModuleKey { .. })
    ));
}

#[test]
fn duplicate_names_are_rejected() {
    let result = InterfaceCreator::<LeafModule, Global>::new()
        .selector("doubled", |leaf: &Leaf| leaf.n)
        .selector("doubled", |leaf: &Leaf| leaf.n * 2)
        .create_node();
    assert_eq!(
        result.err(),
        Some(CompositionError::DuplicateName {
            section: "selectors",
            name: "doubled".to_string(),
        })
    );

    let result = InterfaceCreator::<GlobalModule, Global>::new()
        .child("other", leaf_piece(), lens!(Global, other))
        .child("other", leaf_piece(), lens!(Global, other))
        .create_node();
    assert!(matches!(
        result,
        Err(CompositionError::DuplicateModuleKey { .. })
    ));
}

#[test]
fn lookups_report_what_is_missing() {
    let root = complete(global_piece()).unwrap();

    assert!(matches!(
        root.at(&["branch", "nope"]),
        Err(LookupError::MissingModule { ref path, ref key }) if path == "branch" && key == "nope"
    ));
    assert!(matches!(
        root.selector::<bool>("nope"),
        Err(LookupError::MissingEntry { section: "selectors", .. })
    ));
    assert!(matches!(
        root.selector::<String>("flag"),
        Err(LookupError::TypeMismatch { section: "selectors", .. })
    ));
    assert!(matches!(
        root.thunk::<(), u16>("noop"),
        Err(LookupError::TypeMismatch { section: "thunks", .. })
    ));
    assert!(root.root::<Leaf>().is_err());
}

/// Completing twice yields independent but equivalent trees.
#[test]
fn pieces_can_be_completed_from_fresh_builders() {
    let first = complete(global_piece()).unwrap();
    let second = complete(global_piece()).unwrap();
    let global = sample();
    let a = first.at(&["branch", "leaf"]).unwrap().selector::<u32>("doubled").unwrap();
    let b = second.at(&["branch", "leaf"]).unwrap().selector::<u32>("doubled").unwrap();
    assert_eq!(a(&global), b(&global));
}
