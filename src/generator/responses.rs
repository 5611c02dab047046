//! Response grouping.
//!
//! Two separate pieces:
//! - `partition_responses` splits a response list into success/other
//!   groups by status code, preserving order.
//! - `ResponseListView` renders one already-filtered list. It does no
//!   filtering, so the same primitive serves the Response/Errors tabs and
//!   callback response lists.

use crate::layout::{ResponseEntry, ResponseList};
use crate::model::ResponseNode;
use serde::{Deserialize, Serialize};

/// Named partition a response falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseGroup {
    /// Exactly status `200`.
    Success,
    /// Everything else, including other 2xx codes and `default`.
    Other,
}

impl ResponseGroup {
    pub fn of(response: &ResponseNode) -> Self {
        if response.is_success() {
            Self::Success
        } else {
            Self::Other
        }
    }
}

/// Result of splitting a response list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponsePartition {
    pub success: Vec<ResponseNode>,
    pub other: Vec<ResponseNode>,
}

/// Split `responses` into success and other groups, keeping input order in both.
pub fn partition_responses(responses: &[ResponseNode]) -> ResponsePartition {
    let (success, other) = responses
        .iter()
        .cloned()
        .partition(|r| ResponseGroup::of(r) == ResponseGroup::Success);
    ResponsePartition { success, other }
}

/// Order-preserving list renderer for responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseListView {
    is_callback: bool,
}

impl ResponseListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark rendered lists as belonging to a callback operation.
    pub fn for_callback(mut self, is_callback: bool) -> Self {
        self.is_callback = is_callback;
        self
    }

    /// Render `responses`, or nothing if the list is empty.
    ///
    /// Codes are assumed unique; a duplicate is an upstream data bug and is
    /// passed through as-is.
    pub fn render(&self, responses: &[ResponseNode]) -> Option<ResponseList> {
        if responses.is_empty() {
            return None;
        }

        let entries = responses
            .iter()
            .map(|response| ResponseEntry {
                key: response.code.clone(),
                response: response.clone(),
            })
            .collect();

        Some(ResponseList {
            is_callback: self.is_callback,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn responses(codes: &[&str]) -> Vec<ResponseNode> {
        codes.iter().map(|c| ResponseNode::with_code(*c)).collect()
    }

    fn codes(list: &[ResponseNode]) -> Vec<&str> {
        list.iter().map(|r| r.code.as_str()).collect()
    }

    #[test]
    fn test_partition_by_status() {
        let input = responses(&["default", "200", "404", "201"]);
        let partition = partition_responses(&input);
        assert_eq!(codes(&partition.success), vec!["200"]);
        assert_eq!(codes(&partition.other), vec!["default", "404", "201"]);
    }

    #[test]
    fn test_partition_empty() {
        let partition = partition_responses(&[]);
        assert!(partition.success.is_empty());
        assert!(partition.other.is_empty());
    }

    #[test]
    fn test_render_empty_is_nothing() {
        assert_eq!(ResponseListView::new().render(&[]), None);
    }

    #[test]
    fn test_render_keeps_order_and_keys() {
        let input = responses(&["404", "500", "default"]);
        let list = ResponseListView::new().render(&input).unwrap();
        assert_eq!(list.codes(), vec!["404", "500", "default"]);
        assert!(!list.is_callback);
        assert_eq!(list.entries[1].response, input[1]);
    }

    #[test]
    fn test_render_for_callback() {
        let list = ResponseListView::new()
            .for_callback(true)
            .render(&responses(&["200"]))
            .unwrap();
        assert!(list.is_callback);
    }

    #[test]
    fn test_render_does_not_filter() {
        let input = responses(&["200", "200"]);
        let list = ResponseListView::new().render(&input).unwrap();
        assert_eq!(list.len(), 2);
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;

        fn arb_code() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("200".to_string()),
                Just("default".to_string()),
                (100u16..600).prop_map(|c| c.to_string()),
            ]
        }

        fn arb_responses() -> impl Strategy<Value = Vec<ResponseNode>> {
            prop::collection::vec(arb_code(), 0..12).prop_map(|codes| {
                codes
                    .into_iter()
                    .enumerate()
                    .map(|(i, code)| ResponseNode::with_code(code).with_description(i.to_string()))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn partition_covers_input_in_order(input in arb_responses()) {
                let partition = partition_responses(&input);
                prop_assert_eq!(partition.success.len() + partition.other.len(), input.len());

                let expected_success: Vec<_> =
                    input.iter().filter(|r| r.code == "200").cloned().collect();
                let expected_other: Vec<_> =
                    input.iter().filter(|r| r.code != "200").cloned().collect();
                prop_assert_eq!(&partition.success, &expected_success);
                prop_assert_eq!(&partition.other, &expected_other);
            }

            #[test]
            fn partition_groups_are_disjoint(input in arb_responses()) {
                let partition = partition_responses(&input);
                prop_assert!(partition.success.iter().all(|r| r.code == "200"));
                prop_assert!(partition.other.iter().all(|r| r.code != "200"));
            }

            #[test]
            fn render_is_nothing_iff_empty(input in arb_responses()) {
                let rendered = ResponseListView::new().render(&input);
                prop_assert_eq!(rendered.is_none(), input.is_empty());
            }
        }
    }
}
