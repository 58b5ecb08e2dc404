//! Tests for path-addressed edits and structural sharing

use rstest::{fixture, rstest};

use rstree::util::testing;
use rstree::{Edit, Node, TreeError, TreePath, Transform};

type Outline = Node<&'static str>;

// 1
// ├── 1.1
// │   ├── 1.1.1
// │   ├── 1.1.2
// │   └── 1.1.3
// ├── 1.2
// └── 1.3
//     ├── 1.3.1
//     └── 1.3.2
#[fixture]
fn outline() -> Outline {
    testing::init_test_setup();
    Node::new(
        "1",
        vec![
            Node::new(
                "1.1",
                vec![Node::leaf("1.1.1"), Node::leaf("1.1.2"), Node::leaf("1.1.3")],
            ),
            Node::leaf("1.2"),
            Node::new("1.3", vec![Node::leaf("1.3.1"), Node::leaf("1.3.2")]),
        ],
    )
}

#[rstest]
fn given_outline_when_measuring_then_size_and_height_match(outline: Outline) {
    assert_eq!(outline.size(), 8);
    assert_eq!(outline.height(), 2);
}

#[rstest]
fn given_outline_when_inserting_deep_then_only_path_is_rebuilt(outline: Outline) {
    let edited = outline
        .transform([0], Edit::InsertChildAt(3, Node::leaf("1.1.4")))
        .unwrap();

    assert_eq!(edited.children()[0].child_count(), 4);
    assert_eq!(edited.size(), 9);
    assert!(Node::ptr_eq(&edited.children()[1], &outline.children()[1]));
    assert!(Node::ptr_eq(&edited.children()[2], &outline.children()[2]));

    // original untouched
    assert_eq!(outline.children()[0].child_count(), 3);
    assert_eq!(outline.size(), 8);
}

#[rstest]
#[case(vec![])]
#[case(vec![0])]
#[case(vec![0, 2])]
#[case(vec![2, 1])]
fn given_identity_edit_when_transforming_then_root_is_same_instance(
    outline: Outline,
    #[case] path: Vec<usize>,
) {
    let result = outline.transform_with(&path, |node| Ok(node.clone())).unwrap();
    assert!(Node::ptr_eq(&result, &outline));
}

#[rstest]
fn given_same_child_when_setting_child_then_root_is_same_instance(outline: Outline) {
    let child = outline.locate([2, 0]).unwrap().clone();
    let result = outline.transform([2], Edit::SetChildAt(0, child)).unwrap();
    assert!(Node::ptr_eq(&result, &outline));
}

#[rstest]
#[case(vec![], 1)]
#[case(vec![1], 2)]
#[case(vec![0, 1], 3)]
fn given_edit_at_depth_when_transforming_then_at_most_depth_plus_one_nodes_are_new(
    outline: Outline,
    #[case] path: Vec<usize>,
    #[case] expected_new: usize,
) {
    let edited = outline.transform(&path, Edit::SetPayload("x")).unwrap();
    let stats = edited.shared_with(&outline);

    assert_eq!(stats.total, outline.size());
    assert_eq!(stats.fresh(), expected_new);
    assert_eq!(stats.fresh(), path.len() + 1);
}

#[rstest]
fn given_path_when_locating_then_matches_manual_indexing(outline: Outline) {
    let manual = outline.get_child_at(2).unwrap().get_child_at(1).unwrap();
    let located = outline.locate([2, 1]).unwrap();
    assert!(Node::ptr_eq(manual, located));
    assert_eq!(*located.payload(), "1.3.2");
}

#[rstest]
fn given_bad_index_in_path_when_transforming_then_fails_and_tree_is_intact(outline: Outline) {
    let err = outline
        .transform([1, 0], Edit::SetPayload("x"))
        .unwrap_err();
    assert_eq!(err, TreeError::IndexOutOfRange { index: 0, len: 0 });
    assert_eq!(outline.size(), 8);
}

#[rstest]
fn given_replace_edit_when_transforming_then_subtree_is_swapped(outline: Outline) {
    let replacement = Node::new("new", vec![Node::leaf("n1")]);
    let edited = outline
        .transform([0], Edit::Replace(replacement.clone()))
        .unwrap();
    assert!(Node::ptr_eq(&edited.children()[0], &replacement));
    assert_eq!(edited.size(), 8 - 4 + 2);
}

#[rstest]
fn given_remove_edit_when_transforming_then_child_is_dropped(outline: Outline) {
    let edited = outline.transform([2], Edit::RemoveChildAt(0)).unwrap();
    let payloads: Vec<&str> = edited.children()[2]
        .children()
        .iter()
        .map(|c| *c.payload())
        .collect();
    assert_eq!(payloads, vec!["1.3.2"]);
    assert_eq!(edited.height(), 2);
}

#[rstest]
fn given_transform_builder_when_applied_to_two_versions_then_each_is_edited(outline: Outline) {
    let v2 = Transform::at(TreePath::from([1]))
        .edit(Edit::AddChildren(vec![Node::leaf("1.2.1")]))
        .apply(&outline)
        .unwrap();
    assert_eq!(v2.height(), 2);
    assert_eq!(v2.locate([1, 0]).unwrap().payload(), &"1.2.1");

    let v3 = Transform::at("1/0".parse::<TreePath>().unwrap())
        .edit(Edit::SetPayload("1.2.1'"))
        .apply(&v2)
        .unwrap();
    assert_eq!(*v3.locate([1, 0]).unwrap().payload(), "1.2.1'");
    assert_eq!(*v2.locate([1, 0]).unwrap().payload(), "1.2.1");
    assert!(Node::ptr_eq(&v3.children()[0], &outline.children()[0]));
}

#[rstest]
fn given_map_edit_when_transforming_then_closure_sees_target(outline: Outline) {
    let edited = outline
        .transform(
            [2],
            Edit::map(|node: &Outline| node.insert_child_at(0, Node::leaf("1.3.0"))),
        )
        .unwrap();
    assert_eq!(*edited.locate([2, 0]).unwrap().payload(), "1.3.0");
    assert_eq!(edited.size(), 9);
}
