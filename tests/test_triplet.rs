use proptest::collection::vec;
use proptest::prelude::*;
use stablematch::prelude::*;

fn problem(excluded: &[(usize, usize)]) -> StableMatchingProblem {
    let data = MatchingData::builder()
        .set_indices(vec![0, 0, 1, 1, 2, 2])
        .capacities(vec![1; 6])
        .properties(vec![
            vec![3.0, 8.0],
            vec![7.0, 2.0],
            vec![5.0, 5.0],
            vec![9.0, 1.0],
            vec![4.0, 6.0],
            vec![6.0, 9.0],
        ])
        .weights(vec![vec![1.0, 0.5]; 6])
        .requirement_strings(&vec![vec!["6", "3:9"]; 6])
        .unwrap()
        .excluded_pairs(excluded.iter().copied())
        .build()
        .unwrap();
    StableMatchingProblem::builder(data)
        .fitness_expression("S(1) + S(2) + 2 * S(3)")
        .build()
        .unwrap()
}

fn assert_groups(problem: &StableMatchingProblem, matches: &Matches) {
    let data = problem.data();
    for group in matches.groups() {
        assert_eq!(group.len(), 3, "group {:?}", group);
        let mut sets: Vec<usize> = group.iter().map(|&m| data.set_of(m)).collect();
        sets.sort_unstable();
        assert_eq!(sets, vec![0, 1, 2]);
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                assert!(!data.is_excluded(a, b));
            }
        }
    }
    for individual in 0..data.size() {
        let partners = matches.partners(individual).len();
        assert!(partners == 0 || partners == 2);
    }
}

#[test]
fn test_infers_triplet() {
    assert_eq!(problem(&[]).variant(), MatchingVariant::Triplet);
}

#[test]
fn test_satisfactions_cover_both_partners() {
    let problem = problem(&[]);
    let evaluation = problem.evaluate(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
    assert_groups(&problem, &evaluation.matches);
    assert!(!evaluation.matches.groups().is_empty());

    let preferences = problem.preferences();
    for (individual, &satisfaction) in evaluation.satisfactions.iter().enumerate() {
        let expected: f64 = evaluation
            .matches
            .partners(individual)
            .iter()
            .map(|&p| preferences.get(individual).score_of(p))
            .sum();
        assert_eq!(satisfaction, expected);
    }
}

#[test]
fn test_fitness_weights_third_set() {
    let problem = problem(&[]);
    let evaluation = problem.evaluate(&[0.6, 0.5, 0.4, 0.3, 0.2, 0.1]).unwrap();
    let s = &evaluation.satisfactions;
    let expected = s[0] + s[1] + s[2] + s[3] + 2.0 * (s[4] + s[5]);
    assert!((evaluation.fitness - expected).abs() < 1e-9);
}

proptest! {
    #[test]
    fn test_groups_are_well_formed(keys in vec(0.0f64..1.0, 6)) {
        let problem = problem(&[(0, 2), (1, 5)]);
        let matches = problem.decode(&keys).unwrap();
        assert_groups(&problem, &matches);
    }
}
