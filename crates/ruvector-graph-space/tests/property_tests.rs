//! Property-based tests using proptest

use proptest::prelude::*;
use ruvector_graph_space::prelude::*;

/// Pair of scalar graphs on the same number of nodes
fn graph_pair() -> impl Strategy<Value = (AttributedGraph, AttributedGraph)> {
    (1usize..6).prop_flat_map(|n| {
        (
            prop::collection::vec(-10.0f64..10.0, n * n),
            prop::collection::vec(-10.0f64..10.0, n * n),
        )
            .prop_map(move |(a, b)| {
                (
                    AttributedGraph::from_flat(n, 0, a).unwrap(),
                    AttributedGraph::from_flat(n, 0, b).unwrap(),
                )
            })
    })
}

/// Graph together with a shuffled node order
fn graph_and_relabeling() -> impl Strategy<Value = (AttributedGraph, Permutation)> {
    (1usize..6).prop_flat_map(|n| {
        (
            prop::collection::vec(-10.0f64..10.0, n * n),
            Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
        )
            .prop_map(move |(values, order)| {
                (
                    AttributedGraph::from_flat(n, 0, values).unwrap(),
                    Permutation::try_from_vec(order).unwrap(),
                )
            })
    })
}

fn metric(n: usize, kind: MatcherKind) -> GraphSpaceMetric {
    GraphSpaceMetric::new(GraphSpace::new(n).unwrap())
        .with_matcher(kind)
        .unwrap()
}

proptest! {
    #[test]
    fn self_distance_is_zero((a, _) in graph_pair()) {
        let n = a.n_nodes();
        for kind in [MatcherKind::Identity, MatcherKind::Exhaustive { max_nodes: 5 }] {
            prop_assert_eq!(metric(n, kind).dist(&a, &a).unwrap(), 0.0);
        }
    }

    #[test]
    fn identity_distance_is_ambient_distance((a, b) in graph_pair()) {
        let n = a.n_nodes();
        let expected = EuclideanMetric::new(n * n)
            .distance(&a.flat(), &b.flat())
            .unwrap();
        prop_assert_eq!(metric(n, MatcherKind::Identity).dist(&a, &b).unwrap(), expected);
    }

    #[test]
    fn matchers_return_bijections((a, b) in graph_pair()) {
        let n = a.n_nodes();
        let matchers = [
            Matcher::from_kind(MatcherKind::Faq(FaqConfig::default().with_seed(0))).unwrap(),
            Matcher::from_kind(MatcherKind::Exhaustive { max_nodes: 5 }).unwrap(),
        ];
        for matcher in &matchers {
            let perm = matcher.match_graphs(&a, &b).unwrap();
            let mut sorted = perm.into_vec();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn exhaustive_sees_through_relabeling((g, relabel) in graph_and_relabeling()) {
        let n = g.n_nodes();
        let copy = g.permuted(&relabel).unwrap();
        let d = metric(n, MatcherKind::Exhaustive { max_nodes: 5 }).dist(&g, &copy).unwrap();
        prop_assert_eq!(d, 0.0);
    }

    #[test]
    fn exact_distance_bounds_faq_from_below((g, relabel) in graph_and_relabeling()) {
        let n = g.n_nodes();
        let copy = g.permuted(&relabel).unwrap();
        let exact = metric(n, MatcherKind::Exhaustive { max_nodes: 5 }).dist(&g, &copy).unwrap();
        let faq = metric(n, MatcherKind::Faq(FaqConfig::default())).dist(&g, &copy).unwrap();
        prop_assert!(exact <= faq + 1e-9);
    }

    #[test]
    fn geodesic_endpoints((a, b) in graph_pair(), t in 0.0f64..1.0) {
        let n = a.n_nodes();
        let m = metric(n, MatcherKind::Exhaustive { max_nodes: 5 });
        let alignment = m.align(&a, &b).unwrap();
        let geodesic = m.geodesic(&a, &b).unwrap();

        prop_assert_eq!(geodesic.at(0.0).unwrap(), a.clone());
        prop_assert_eq!(geodesic.at(1.0).unwrap(), alignment.aligned.clone());

        // along the segment the distance to `a` is t·dist(a, b)
        let total = m.ambient_metric().distance(&a.flat(), &alignment.aligned.flat()).unwrap();
        let partial = m.ambient_metric()
            .distance(&a.flat(), &geodesic.at(t).unwrap().flat())
            .unwrap();
        prop_assert!((partial - t * total).abs() <= 1e-9 * (1.0 + total));
    }

    #[test]
    fn permutation_inverse_undoes_relabeling((g, relabel) in graph_and_relabeling()) {
        let back = g.permuted(&relabel).unwrap().permuted(&relabel.inverse()).unwrap();
        prop_assert_eq!(back, g);
    }
}
