use stablematch::prelude::*;

fn problem() -> StableMatchingProblem {
    let data = MatchingData::builder()
        .set_indices(vec![0, 0, 0, 1, 1, 1])
        .capacities(vec![1; 6])
        .properties(vec![
            vec![2.0, 7.0],
            vec![6.0, 1.0],
            vec![9.0, 4.0],
            vec![5.0, 5.0],
            vec![8.0, 2.0],
            vec![1.0, 9.0],
        ])
        .weights(vec![vec![1.0, 0.5]; 6])
        .requirement_strings(&vec![vec!["7", "3++"]; 6])
        .unwrap()
        .exclude(2, 4)
        .build()
        .unwrap();
    StableMatchingProblem::builder(data)
        .fitness_expression("SIGMA{S1} + SIGMA{S2}")
        .build()
        .unwrap()
}

#[test]
fn test_ordinary() {
    let problem = problem();
    let mut rng = RandomNumberGenerator::from_seed(7);
    let starting_value = problem.random_candidate(&mut rng);
    let starting_score = problem.score(&starting_value).unwrap();

    let options = EvolutionOptions::builder()
        .num_generations(20)
        .population_size(3)
        .num_offspring(12)
        .build();
    let launcher = EvolutionLauncher::new(OrdinaryStrategy::default(), &problem);
    let winner = launcher.evolve(&options, starting_value, &mut rng).unwrap();

    assert!(winner.score >= starting_score);
    assert_eq!(winner.score, problem.evaluate(winner.pheno.keys()).unwrap().fitness);
}

#[test]
fn test_bounded() {
    let problem = problem();
    let mut rng = RandomNumberGenerator::from_seed(8);
    let starting_value = problem.random_candidate(&mut rng);
    let starting_score = problem.score(&starting_value).unwrap();

    let options = EvolutionOptions::builder().num_generations(10).build();
    let launcher = EvolutionLauncher::new(BoundedBreedStrategy::new(500), &problem);
    let winner = launcher.evolve(&options, starting_value, &mut rng).unwrap();

    assert!(winner.score >= starting_score);
    assert!(winner.pheno.in_bounds());
}

#[test]
fn test_parallel_generation() {
    let problem = problem();
    let mut rng = RandomNumberGenerator::from_seed(21);
    let options = EvolutionOptions::builder()
        .num_generations(5)
        .num_offspring(30)
        .parallel_threshold(1)
        .build();
    let launcher = EvolutionLauncher::new(OrdinaryStrategy::default(), &problem);

    let winner = launcher
        .evolve(&options, CandidateKeys::identity(6), &mut rng)
        .unwrap();
    assert_eq!(winner.pheno.len(), 6);
    assert_eq!(winner.score, problem.score(&winner.pheno).unwrap());
}

#[test]
fn test_verbose_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let problem = problem();
    let mut rng = RandomNumberGenerator::from_seed(2);
    let options = EvolutionOptions::builder()
        .num_generations(2)
        .num_offspring(4)
        .log_level(LogLevel::Verbose)
        .build();
    let launcher = EvolutionLauncher::new(OrdinaryStrategy::default(), &problem);
    assert!(launcher
        .evolve(&options, problem.random_candidate(&mut rng), &mut rng)
        .is_ok());
}

#[test]
fn test_ordinary_with_invalid_options() {
    let problem = problem();
    let mut rng = RandomNumberGenerator::new();
    let starting_value = CandidateKeys::identity(6);
    let options = EvolutionOptions::new(100, LogLevel::None, 0, 20);
    let launcher = EvolutionLauncher::new(OrdinaryStrategy::default(), &problem);

    let result = launcher.evolve(&options, starting_value, &mut rng);
    match result {
        Err(MatchingError::Configuration(msg)) => {
            assert!(msg.contains("Population size cannot be zero"));
        }
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_bounded_with_invalid_options() {
    let problem = problem();
    let mut rng = RandomNumberGenerator::new();
    let options = EvolutionOptions::new(100, LogLevel::None, 5, 0);
    let launcher = EvolutionLauncher::new(BoundedBreedStrategy::default(), &problem);

    let result = launcher.evolve(&options, CandidateKeys::identity(6), &mut rng);
    match result {
        Err(MatchingError::Configuration(msg)) => {
            assert!(msg.contains("Number of offspring cannot be zero"));
        }
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_candidate_of_wrong_length_fails() {
    let problem = problem();
    let mut rng = RandomNumberGenerator::new();
    let launcher = EvolutionLauncher::new(OrdinaryStrategy::default(), &problem);

    let result = launcher.evolve(
        &EvolutionOptions::default(),
        CandidateKeys::identity(4),
        &mut rng,
    );
    assert!(matches!(result, Err(MatchingError::InvalidCandidate(_))));
}

#[test]
fn test_runner_compares_algorithms() {
    let options = EvolutionOptions::builder()
        .num_generations(4)
        .num_offspring(8)
        .build();
    let reports = MatchingRunner::new(problem(), options)
        .with_run_count(3)
        .with_seed(5)
        .register(Algorithm::ordinary())
        .register(Algorithm::bounded())
        .run()
        .unwrap();

    assert_eq!(reports.len(), 6);
    let best = AlgorithmReport::best(&reports).unwrap();
    assert!(reports.iter().all(|r| r.fitness <= best.fitness));
    for report in &reports {
        assert!(!report.matches.is_matched(2, 4));
    }
}
