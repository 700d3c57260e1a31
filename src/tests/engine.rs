#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use helpers::encoder::TestBitmap;
    use ntest::assert_about_eq;
    use rstest::rstest;

    use crate::{
        base::{Decision, UNSET_SCORE},
        bitmap::RoaringBitmap,
        error::FieldAccessError,
        scoring::{
            Comparator, FallbackReason, FieldValues, InMemoryDocument, ScoringParams,
            SecondaryGate, SkipListScorer,
        },
    };

    const MEMBERS: [u32; 3] = [3, 65537, 131072];

    fn scorer(skip_score: Option<f64>, gate: Option<SecondaryGate>) -> SkipListScorer {
        let params = ScoringParams {
            field: "id".to_string(),
            payload: TestBitmap::from_ids(MEMBERS).serialize(),
            skip_score,
            gate,
        };
        SkipListScorer::from_params(Arc::new(params))
    }

    fn gate(comparator: Comparator, threshold: i64) -> Option<SecondaryGate> {
        Some(SecondaryGate {
            field: "date".to_string(),
            comparator,
            threshold,
        })
    }

    fn doc(id: &str) -> InMemoryDocument {
        InMemoryDocument::new().with_text("id", id)
    }

    #[test]
    fn test_member_without_gate() {
        let scorer = scorer(Some(0.25), None);
        for id in MEMBERS {
            assert_eq!(
                scorer.decide(&doc(&id.to_string())),
                Decision::Override(0.25)
            );
        }
        assert_about_eq!(scorer.score(&doc("65537"), 12.), 0.25);
    }

    #[test]
    fn test_not_member() {
        let scorer = scorer(Some(0.25), None);
        assert_eq!(
            scorer.evaluate(&doc("4")),
            Err(FallbackReason::NotMember(4))
        );
        assert_about_eq!(scorer.score(&doc("4"), 12.), 12.);
    }

    #[test]
    fn test_unset_score() {
        let scorer = scorer(None, None);
        assert_eq!(scorer.decide(&doc("3")), Decision::Override(UNSET_SCORE));
    }

    #[rstest]
    #[case(InMemoryDocument::new(), FallbackReason::MissingIdentifier)]
    #[case(doc("abc"), FallbackReason::InvalidIdentifier("abc".to_string()))]
    #[case(doc(""), FallbackReason::InvalidIdentifier("".to_string()))]
    #[case(doc("3.0"), FallbackReason::InvalidIdentifier("3.0".to_string()))]
    #[case(doc("4294967296"), FallbackReason::InvalidIdentifier("4294967296".to_string()))]
    #[case(
        InMemoryDocument::new().with_date("id", 3),
        FallbackReason::IdentifierAccess(FieldAccessError::WrongType {
            field: "id".to_string(),
            expected: "string"
        })
    )]
    #[case(
        InMemoryDocument::new().with_values("id", FieldValues::Text(vec![])),
        FallbackReason::IdentifierAccess(FieldAccessError::NoValue("id".to_string()))
    )]
    fn test_identifier_failures(#[case] document: InMemoryDocument, #[case] reason: FallbackReason) {
        let scorer = scorer(Some(0.25), None);
        assert_eq!(scorer.evaluate(&document), Err(reason));
        assert_eq!(scorer.decide(&document), Decision::Fallback);
    }

    #[rstest]
    #[case(Comparator::LessThan, 500, Decision::Fallback)]
    #[case(Comparator::LessThan, 1000, Decision::Override(0.5))]
    #[case(Comparator::LessThan, 1500, Decision::Override(0.5))]
    #[case(Comparator::GreaterThan, 1500, Decision::Fallback)]
    #[case(Comparator::GreaterThan, 1000, Decision::Override(0.5))]
    #[case(Comparator::GreaterThan, 500, Decision::Override(0.5))]
    fn test_gate(#[case] comparator: Comparator, #[case] stored: i64, #[case] expected: Decision) {
        let scorer = scorer(Some(0.5), gate(comparator, 1000));
        let document = doc("131072").with_date("date", stored);
        assert_eq!(scorer.decide(&document), expected);
    }

    #[test]
    fn test_gate_absent_field() {
        let scorer = scorer(Some(0.5), gate(Comparator::LessThan, 1000));
        assert_eq!(scorer.decide(&doc("3")), Decision::Override(0.5));
    }

    #[test]
    fn test_unknown_comparator() {
        let scorer = scorer(Some(0.5), gate(Comparator::Other(">=".to_string()), 1000));
        for stored in [500, 1000, 1500] {
            let document = doc("65537").with_date("date", stored);
            assert_eq!(
                scorer.evaluate(&document),
                Err(FallbackReason::Gated {
                    stored,
                    threshold: 1000
                })
            );
        }
        assert_eq!(scorer.decide(&doc("65537")), Decision::Override(0.5));
    }

    #[test]
    fn test_gate_not_member() {
        let scorer = scorer(Some(0.5), gate(Comparator::LessThan, 1000));
        let document = doc("5").with_date("date", 1500);
        assert_eq!(scorer.decide(&document), Decision::Fallback);
    }

    #[rstest]
    #[case(
        FieldValues::Date(vec![]),
        FieldAccessError::NoValue("date".to_string())
    )]
    #[case(
        FieldValues::Text(vec!["2020-01-01".to_string()]),
        FieldAccessError::WrongType { field: "date".to_string(), expected: "date" }
    )]
    fn test_gate_unreadable(#[case] values: FieldValues, #[case] error: FieldAccessError) {
        let scorer = scorer(Some(0.5), gate(Comparator::LessThan, 1000));
        let document = doc("3").with_values("date", values);
        assert_eq!(
            scorer.evaluate(&document),
            Err(FallbackReason::SecondaryAccess(error))
        );
    }

    #[test]
    fn test_negative_identifier() {
        let params = ScoringParams {
            field: "id".to_string(),
            payload: TestBitmap::from_ids([u32::MAX]).serialize(),
            skip_score: Some(1.),
            gate: None,
        };
        let scorer = SkipListScorer::from_params(Arc::new(params));
        assert_eq!(scorer.decide(&doc("-1")), Decision::Override(1.));
        assert_eq!(scorer.decide(&doc("4294967295")), Decision::Fallback);
    }

    #[test]
    fn test_malformed_payload() {
        let mut payload = TestBitmap::from_ids(MEMBERS).serialize();
        payload.truncate(payload.len() - 1);
        let params = ScoringParams {
            field: "id".to_string(),
            payload,
            skip_score: Some(1.),
            gate: None,
        };

        let scorer = SkipListScorer::from_params(Arc::new(params));
        assert_eq!(scorer.bitmap().container_count(), 0);
        for id in MEMBERS {
            assert_eq!(scorer.decide(&doc(&id.to_string())), Decision::Fallback);
        }
    }

    #[test]
    fn test_shared_scorer() {
        let scorer = scorer(Some(2.), None);
        let bitmap = Arc::new(RoaringBitmap::deserialize(&scorer.params().payload).unwrap());
        let other = SkipListScorer::new(Arc::new(scorer.params().clone()), bitmap);

        std::thread::scope(|s| {
            for t in 0..4u32 {
                let (a, b) = (&scorer, &other);
                s.spawn(move || {
                    for id in 0..1000u32 {
                        let id = id * 4 + t;
                        let document = doc(&id.to_string());
                        assert_eq!(a.decide(&document), b.decide(&document));
                    }
                });
            }
        });
    }
}
