use mixopt::search::total_search_space;
use mixopt::{
    Algorithm, MixError, MultiplierTable, NullReporter, ParallelConfig, Product, ProgressPolicy,
    Rule, RuleKind, SearchConfig, SearchResult, Substance, run, run_with_config,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

const EFFECT_POOL: &[&str] = &[
    "Calming",
    "Energizing",
    "Euphoric",
    "Foggy",
    "Gingeritis",
    "Sneaky",
    "Toxic",
    "Zombifying",
];

struct Inputs {
    product: Product,
    substances: Vec<Substance>,
    multipliers: MultiplierTable,
}

fn pick<'a>(rng: &mut ChaCha8Rng, pool: &[&'a str]) -> &'a str {
    pool[rng.random_range(0..pool.len())]
}

fn random_names(rng: &mut ChaCha8Rng, max: usize) -> Vec<&'static str> {
    let count = rng.random_range(0..=max);
    (0..count).map(|_| pick(rng, EFFECT_POOL)).collect()
}

fn random_inputs(seed: u64, substance_count: usize) -> Inputs {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let product_names = ["OG Kush", "Meth", "Cocaine"];
    let product = Product::new(
        product_names[rng.random_range(0..product_names.len())],
        pick(&mut rng, EFFECT_POOL),
    );

    let substances = (0..substance_count)
        .map(|i| {
            let rule_count = rng.random_range(0..=3);
            let rules = (0..rule_count)
                .map(|_| {
                    let condition = random_names(&mut rng, 2);
                    let excluded = random_names(&mut rng, 1);
                    let target = pick(&mut rng, EFFECT_POOL);
                    if rng.random_bool(0.7) {
                        Rule::replace(&condition, &excluded, target, pick(&mut rng, EFFECT_POOL))
                    } else {
                        Rule::add(&condition, &excluded, target)
                    }
                })
                .collect();
            Substance::new(
                format!("S{}", i),
                rng.random_range(0..800),
                pick(&mut rng, EFFECT_POOL),
            )
            .with_rules(rules)
        })
        .collect();

    // Never below -10 per effect, so no price can go negative
    let mut multipliers = MultiplierTable::new();
    for name in EFFECT_POOL {
        if rng.random_bool(0.8) {
            multipliers.insert(name.to_string(), rng.random_range(-10..70));
        }
    }

    Inputs {
        product,
        substances,
        multipliers,
    }
}

// --- Reference implementation over plain strings ---

fn reference_effects(inputs: &Inputs, path: &[usize]) -> BTreeSet<String> {
    let mut effects = BTreeSet::from([inputs.product.initial_effect.clone()]);
    for (position, &index) in path.iter().enumerate() {
        let substance = &inputs.substances[index];
        let original = effects.clone();
        for rule in &substance.rules {
            if !rule.condition.iter().all(|c| original.contains(c)) {
                continue;
            }
            if rule.if_not_present.iter().any(|c| original.contains(c)) {
                continue;
            }
            match rule.kind {
                RuleKind::Replace => {
                    let Some(with) = rule.with_effect.as_ref().filter(|w| !w.is_empty()) else {
                        continue;
                    };
                    if effects.contains(&rule.target) && !effects.contains(with) {
                        effects.remove(&rule.target);
                        effects.insert(with.clone());
                    }
                }
                RuleKind::Add => {
                    effects.insert(rule.target.clone());
                }
            }
        }
        if position < 9 {
            effects.insert(substance.default_effect.clone());
        }
    }
    effects
}

fn reference_price(inputs: &Inputs, effects: &BTreeSet<String>) -> i64 {
    let name = &inputs.product.name;
    let base = if name.contains("Meth") {
        7000
    } else if name.contains("Cocaine") {
        15000
    } else {
        3500
    };
    let total: i64 = effects
        .iter()
        .map(|e| inputs.multipliers.get(e).copied().unwrap_or(0))
        .sum();
    base + base * total / 100
}

/// Every mix of length 1..=max_depth in lexicographic order
fn all_mixes(n: usize, max_depth: usize) -> Vec<Vec<usize>> {
    fn extend(prefix: &mut Vec<usize>, n: usize, max_depth: usize, out: &mut Vec<Vec<usize>>) {
        for i in 0..n {
            prefix.push(i);
            out.push(prefix.clone());
            if prefix.len() < max_depth {
                extend(prefix, n, max_depth, out);
            }
            prefix.pop();
        }
    }
    let mut out = Vec::new();
    extend(&mut Vec::new(), n, max_depth, &mut out);
    out
}

fn brute_force(inputs: &Inputs, max_depth: usize, algorithm: Algorithm) -> SearchResult {
    let mut mixes = all_mixes(inputs.substances.len(), max_depth);
    if algorithm == Algorithm::BreadthFirst {
        mixes.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    }

    let mut best: Option<SearchResult> = None;
    for mix in mixes {
        let sell = reference_price(inputs, &reference_effects(inputs, &mix));
        let cost: i64 = mix.iter().map(|&i| inputs.substances[i].cost_cents).sum();
        if best.as_ref().is_none_or(|b| sell - cost > b.profit_cents) {
            best = Some(SearchResult {
                mix_path: mix.iter().map(|&i| inputs.substances[i].name.clone()).collect(),
                profit_cents: sell - cost,
                sell_price_cents: sell,
                cost_cents: cost,
            });
        }
    }
    best.unwrap()
}

fn search(inputs: &Inputs, config: &SearchConfig, workers: usize) -> mixopt::ParallelResult {
    run_with_config(
        &inputs.product,
        &inputs.substances,
        &inputs.multipliers,
        config,
        &ParallelConfig::default().with_workers(workers),
        &mut NullReporter,
    )
    .unwrap()
}

#[test]
fn test_random_catalogs_match_brute_force() {
    for seed in 0..12 {
        let substance_count = 2 + (seed as usize % 4);
        let inputs = random_inputs(seed, substance_count);
        let max_depth = if substance_count > 4 { 3 } else { 4 };

        for algorithm in [Algorithm::DepthFirst, Algorithm::BreadthFirst] {
            let expected = brute_force(&inputs, max_depth, algorithm);
            let config = SearchConfig::default()
                .with_algorithm(algorithm)
                .with_max_depth(max_depth);

            for workers in [1, 3] {
                let result = search(&inputs, &config, workers);
                assert_eq!(
                    result.best_result.as_ref(),
                    Some(&expected),
                    "seed {} {} with {} workers",
                    seed,
                    algorithm,
                    workers
                );
                assert_eq!(
                    result.total_statistics.nodes_evaluated,
                    total_search_space(substance_count, max_depth)
                );
            }
        }
    }
}

#[test]
fn test_random_catalogs_past_default_effect_cap() {
    for seed in 100..104 {
        let inputs = random_inputs(seed, 2);
        let config = SearchConfig::default().with_max_depth(11);
        let result = search(&inputs, &config, 2);
        assert_eq!(
            result.best_result.unwrap(),
            brute_force(&inputs, 11, Algorithm::DepthFirst),
            "seed {}",
            seed
        );
    }
}

#[test]
fn test_strategies_agree_on_money() {
    for seed in 200..206 {
        let inputs = random_inputs(seed, 4);
        let dfs = SearchConfig::default().with_max_depth(4);
        let bfs = dfs.clone().with_algorithm(Algorithm::BreadthFirst);

        let a = search(&inputs, &dfs, 4).best_result.unwrap();
        let b = search(&inputs, &bfs, 4).best_result.unwrap();
        assert_eq!(a.profit_cents, b.profit_cents);
        assert_eq!(a.sell_price_cents, b.sell_price_cents);
        assert_eq!(a.cost_cents, b.cost_cents);
        assert_eq!(a.profit_cents, a.sell_price_cents - a.cost_cents);
        assert!(a.cost_cents >= 0);
        assert!(a.sell_price_cents >= 0);
    }
}

#[test]
fn test_memoization_never_changes_result() {
    for seed in 300..306 {
        let inputs = random_inputs(seed, 5);
        let memo = SearchConfig::default().with_max_depth(4);
        let bounded = memo.clone().with_memo_capacity(8);
        let plain = memo.clone().with_memoize(false);

        let expected = search(&inputs, &plain, 5).best_result;
        assert_eq!(search(&inputs, &memo, 5).best_result, expected);
        assert_eq!(search(&inputs, &bounded, 5).best_result, expected);
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let inputs = random_inputs(42, 5);
    let config = SearchConfig::default()
        .with_max_depth(4)
        .with_progress(ProgressPolicy::fixed(37));
    let first = search(&inputs, &config, 16).best_result;
    for _ in 0..5 {
        assert_eq!(search(&inputs, &config, 16).best_result, first);
    }
}

#[test]
fn test_single_substance_example() {
    let product = Product::new("Weed", "Calming");
    let substances = [Substance::new("Cuke", 200, "Energizing")];
    let multipliers =
        MultiplierTable::from([("Calming".to_string(), 20), ("Energizing".to_string(), 10)]);

    let best = run(&product, &substances, &multipliers, 1, None).unwrap();
    assert_eq!(best.mix_path, vec!["Cuke".to_string()]);
    assert_eq!(best.sell_price_cents, 4550);
    assert_eq!(best.cost_cents, 200);
    assert_eq!(best.profit_cents, 4350);
}

#[test]
fn test_progress_callback_final_call() {
    let inputs = random_inputs(7, 4);
    let mut last = None;
    let mut count = 0;
    let mut callback = |depth: usize, processed: u64, total: u64| {
        count += 1;
        last = Some((depth, processed, total));
    };
    run(
        &inputs.product,
        &inputs.substances,
        &inputs.multipliers,
        5,
        Some(&mut callback),
    )
    .unwrap();

    let total = total_search_space(4, 5);
    assert!(count >= 1);
    assert_eq!(last, Some((5, total, total)));
}

#[test]
fn test_preconditions_fail_fast() {
    let inputs = random_inputs(1, 3);
    let err = run(
        &inputs.product,
        &inputs.substances,
        &inputs.multipliers,
        17,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, MixError::InvalidDepth { requested: 17, .. }));

    let err = run(&inputs.product, &[], &inputs.multipliers, 3, None).unwrap_err();
    assert!(matches!(err, MixError::NoSubstances));
}
