//! Evaluating parsed selectors against a [`SelectorTarget`].

use crate::{CompoundSelector, SelectorList, SelectorTarget, SimpleSelector};

/// True if any selector in `list` matches `node`.
pub fn matches_selector_list<T: SelectorTarget>(target: &T, node: T::Node, list: &SelectorList) -> bool {
    list.selectors
        .iter()
        .any(|compound| matches_compound(target, node, compound))
}

/// True if every part of `compound` holds for `node`.
pub fn matches_compound<T: SelectorTarget>(target: &T, node: T::Node, compound: &CompoundSelector) -> bool {
    compound.parts.iter().all(|part| matches_part(target, node, part))
}

fn matches_part<T: SelectorTarget>(target: &T, node: T::Node, part: &SimpleSelector) -> bool {
    match part {
        SimpleSelector::Any => true,
        SimpleSelector::Tag(tag) => target.local_name(node).eq_ignore_ascii_case(tag),
        SimpleSelector::Class(class) => target.has_class(node, class),
        SimpleSelector::Id(id) => target.id(node) == Some(id.as_str()),
        SimpleSelector::AttributeEquals { name, value } => {
            target.attribute(node, name) == Some(value.as_str())
        }
        SimpleSelector::AttributeExists(name) => target.attribute(node, name).is_some(),
    }
}

/// First of `candidates`, in iteration order, that `list` matches.
pub fn query_first<T, I>(target: &T, candidates: I, list: &SelectorList) -> Option<T::Node>
where
    T: SelectorTarget,
    I: IntoIterator<Item = T::Node>,
{
    candidates
        .into_iter()
        .find(|node| matches_selector_list(target, *node, list))
}
