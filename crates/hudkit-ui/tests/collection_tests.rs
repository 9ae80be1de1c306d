//! Ownership contract tests for collections and chains.

use hudkit_ui::widgets::Block;
use hudkit_ui::{Chain, ChainConfig, Container, HudCollection, HudError, HudTree, NodeId};

fn nodes(tree: &mut HudTree, count: usize) -> Vec<NodeId> {
    (0..count).map(|_| tree.add_node(Block::new())).collect()
}

fn order(tree: &HudTree, id: NodeId) -> Vec<NodeId> {
    tree.collection(id).unwrap().iter().map(|c| c.node).collect()
}

#[test]
fn test_add_transfers_ownership_at_expected_index() {
    let mut tree = HudTree::new();
    let chain = tree.add_node(Chain::new(ChainConfig::vertical()));
    let ids = nodes(&mut tree, 3);

    {
        let mut members = tree.collection_mut(chain).unwrap();
        members.add(ids[0]).unwrap();
        members.add(ids[2]).unwrap();
        members.insert(1, Container::with_scale(ids[1], 1.5)).unwrap();
    }

    for &id in &ids {
        assert_eq!(tree.base(id).unwrap().parent(), Some(chain));
    }
    assert_eq!(order(&tree, chain), ids);
    assert_eq!(tree.collection(chain).unwrap().index_of(ids[1]), Some(1));
    assert_eq!(tree.collection(chain).unwrap().get(1).unwrap().align_axis_scale, 1.5);
}

#[test]
fn test_adding_owned_child_fails_fast() {
    let mut tree = HudTree::new();
    let list = tree.add_node(HudCollection::new());
    let ids = nodes(&mut tree, 2);

    let mut members = tree.collection_mut(list).unwrap();
    members.add(ids[0]).unwrap();
    members.add(ids[1]).unwrap();

    let err = members.insert(0, ids[1]).unwrap_err();
    assert_eq!(
        err,
        HudError::AlreadyRegistered {
            node: ids[1],
            parent: list
        }
    );
    assert_eq!(members.len(), 2);
    assert_eq!(err.to_string(), format!("Node {:?} is already registered to {:?}", ids[1], list));
}

#[test]
fn test_ancestor_cannot_become_member() {
    let mut tree = HudTree::new();
    let outer = tree.add_node(HudCollection::new());
    let inner = tree.add_node(HudCollection::new());
    tree.collection_mut(outer).unwrap().add(inner).unwrap();

    let err = tree.collection_mut(inner).unwrap().add(outer).unwrap_err();
    assert_eq!(
        err,
        HudError::RegistrationFailed {
            node: outer,
            parent: inner
        }
    );
    assert!(tree.collection(inner).unwrap().is_empty());
    assert_eq!(tree.base(outer).unwrap().parent(), None);
}

#[test]
fn test_removal_preserves_relative_order() {
    let mut tree = HudTree::new();
    let list = tree.add_node(HudCollection::new());
    let ids = nodes(&mut tree, 6);
    {
        let mut members = tree.collection_mut(list).unwrap();
        for &id in &ids {
            members.add(id).unwrap();
        }
        assert!(members.remove(ids[4]).unwrap());
        members.remove_range(1, 2).unwrap();
        members.remove_at(0).unwrap();
    }

    assert_eq!(order(&tree, list), vec![ids[3], ids[5]]);
    for &gone in &[ids[0], ids[1], ids[2], ids[4]] {
        assert_eq!(tree.base(gone).unwrap().parent(), None);
    }
}

#[test]
fn test_removing_node_from_tree_drops_container() {
    let mut tree = HudTree::new();
    let list = tree.add_node(HudCollection::new());
    let nested = tree.add_node(HudCollection::new());
    let ids = nodes(&mut tree, 3);
    {
        let mut members = tree.collection_mut(list).unwrap();
        members.add(ids[0]).unwrap();
        members.add(nested).unwrap();
        members.add(ids[1]).unwrap();
    }
    tree.collection_mut(nested).unwrap().add(ids[2]).unwrap();

    assert_eq!(tree.remove_node(nested).unwrap(), 2);
    assert_eq!(order(&tree, list), vec![ids[0], ids[1]]);
    assert!(!tree.contains(ids[2]));
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_clear_releases_everything() {
    let mut tree = HudTree::new();
    let chain = tree.add_node(Chain::new(ChainConfig::horizontal()));
    let ids = nodes(&mut tree, 4);
    {
        let mut members = tree.collection_mut(chain).unwrap();
        for &id in &ids {
            members.add(id).unwrap();
        }
        members.clear().unwrap();
    }

    assert!(tree.collection(chain).unwrap().is_empty());
    assert!(tree.base(chain).unwrap().children().is_empty());

    // Released nodes can be registered again.
    tree.collection_mut(chain).unwrap().add(ids[3]).unwrap();
    assert_eq!(order(&tree, chain), vec![ids[3]]);
}

#[test]
fn test_sort_defaults_to_creation_order() {
    let mut tree = HudTree::new();
    let list = tree.add_node(HudCollection::new());
    let ids = nodes(&mut tree, 4);
    {
        let mut members = tree.collection_mut(list).unwrap();
        for &id in ids.iter().rev() {
            members.add(id).unwrap();
        }
        members.sort();
    }
    assert_eq!(order(&tree, list), ids);
}

#[test]
fn test_leaf_is_not_a_collection() {
    let mut tree = HudTree::new();
    let ids = nodes(&mut tree, 2);
    assert!(matches!(tree.collection_mut(ids[0]), Err(HudError::NotACollection(id)) if id == ids[0]));
    assert!(matches!(tree.collection(ids[1]), Err(HudError::NotACollection(_))));
}
