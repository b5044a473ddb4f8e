//! Randomized checks that delta evaluation agrees with full evaluation, plus
//! distance measure properties, on generated datasets.

use std::sync::Arc;

use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;

use corehunter::compute::distance::{CachedDistance, DistanceCache, build_measure};
use corehunter::compute::objective::{WeightedObjective, build_objective_with_cache};
use corehunter::compute::{DistanceMeasure, Objective, Subset, SubsetMove};
use corehunter::data::{
    CoreHunterData, DistanceMatrixData, Feature, GenotypeData, Header, Marker, PhenotypeData,
    PhenotypeValue, Scale,
};
use corehunter::schema::{
    DistanceMeasureType, MissingAlleleResolution, MissingValuesPolicy, ObjectiveConfig,
    ObjectiveType,
};

const TOLERANCE: f64 = 1e-10;

fn random_genotypes(rng: &mut StdRng, headers: &[Header]) -> GenotypeData {
    let markers: Vec<Marker> = (0..rng.gen_range(1..=4))
        .map(|m| Marker::with_allele_count(Some(format!("m{}", m)), rng.gen_range(2..=4)))
        .collect();
    let frequencies: Vec<Vec<Vec<Option<f64>>>> = headers
        .iter()
        .map(|_| {
            markers
                .iter()
                .map(|marker| {
                    if rng.gen_bool(0.15) {
                        return vec![None; marker.num_alleles()];
                    }
                    // frequently homozygous, so some alleles stay unobserved
                    let weights: Vec<f64> = (0..marker.num_alleles())
                        .map(|_| if rng.gen_bool(0.5) { 0.0 } else { rng.gen_range(0.1..1.0) })
                        .collect();
                    let total: f64 = weights.iter().sum();
                    let mut values: Vec<Option<f64>> = if total == 0.0 {
                        let mut values = vec![Some(0.0); marker.num_alleles()];
                        values[rng.gen_range(0..marker.num_alleles())] = Some(1.0);
                        values
                    } else {
                        weights.iter().map(|w| Some(w / total)).collect()
                    };
                    // partially missing: some alleles unknown, the rest kept
                    if rng.gen_bool(0.15) {
                        let blank = rng.gen_range(0..marker.num_alleles());
                        values[blank] = None;
                        for value in values.iter_mut() {
                            if rng.gen_bool(0.3) {
                                *value = None;
                            }
                        }
                    }
                    values
                })
                .collect()
        })
        .collect();
    GenotypeData::new(headers.to_vec(), markers, frequencies).unwrap()
}

fn random_phenotypes(rng: &mut StdRng, headers: &[Header]) -> PhenotypeData {
    let features = vec![
        Feature::new("awned", Scale::Binary),
        Feature::new("colour", Scale::Nominal),
        Feature::new(
            "height",
            Scale::Ranged {
                min: Some(0.0),
                max: Some(100.0),
            },
        ),
    ];
    let colours = ["red", "white", "brown"];
    let values: Vec<Vec<Option<PhenotypeValue>>> = headers
        .iter()
        .map(|_| {
            vec![
                (!rng.gen_bool(0.1)).then(|| PhenotypeValue::Binary(rng.gen_bool(0.5))),
                (!rng.gen_bool(0.1)).then(|| {
                    PhenotypeValue::Nominal(colours[rng.gen_range(0..colours.len())].to_string())
                }),
                (!rng.gen_bool(0.1)).then(|| PhenotypeValue::Number(rng.gen_range(0.0..=100.0))),
            ]
        })
        .collect();
    PhenotypeData::new(headers.to_vec(), features, values).unwrap()
}

fn random_distances(rng: &mut StdRng, headers: &[Header]) -> DistanceMatrixData {
    let n = headers.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..i {
            let d = rng.gen_range(0.0..10.0);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
    DistanceMatrixData::new(headers.to_vec(), matrix).unwrap()
}

fn random_dataset(seed: u64) -> CoreHunterData {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = rng.gen_range(2..=12);
    let headers: Vec<Header> = (0..n).map(|i| Header::named(format!("acc-{}", i))).collect();
    let genotypes = random_genotypes(&mut rng, &headers);
    let phenotypes = random_phenotypes(&mut rng, &headers);
    let distances = random_distances(&mut rng, &headers);
    CoreHunterData::new(Some(genotypes), Some(phenotypes), Some(distances)).unwrap()
}

/// Random valid move on `subset`, possibly touching several items.
fn random_move(rng: &mut StdRng, subset: &Subset) -> SubsetMove {
    let added: Vec<usize> = subset.unselected().filter(|_| rng.gen_bool(0.3)).collect();
    let removed: Vec<usize> = subset
        .selected()
        .iter()
        .copied()
        .filter(|_| rng.gen_bool(0.3))
        .collect();
    SubsetMove::new(added, removed)
}

fn all_configs() -> Vec<ObjectiveConfig> {
    let pairwise = [
        ObjectiveType::AverageEntryToEntry,
        ObjectiveType::AverageEntryToNearestEntry,
        ObjectiveType::AverageAccessionToNearestEntry,
    ];
    let measures = [
        DistanceMeasureType::ModifiedRogers,
        DistanceMeasureType::CavalliSforzaEdwards,
        DistanceMeasureType::Gower,
        DistanceMeasureType::Precomputed,
    ];
    let mut configs = Vec::new();
    for objective in pairwise {
        for measure in measures {
            for policy in [MissingValuesPolicy::Floor, MissingValuesPolicy::Ceil] {
                let mut config = ObjectiveConfig::new(objective).with_measure(measure);
                config.missing_values = policy;
                configs.push(config);
            }
        }
    }
    for objective in [
        ObjectiveType::Coverage,
        ObjectiveType::Shannon,
        ObjectiveType::HeterozygousLoci,
    ] {
        for resolution in [
            MissingAlleleResolution::MostFrequentAllele,
            MissingAlleleResolution::Unresolved,
        ] {
            let mut config = ObjectiveConfig::new(objective);
            config.allele_resolution = resolution;
            configs.push(config);
        }
    }
    configs
}

fn assert_close(delta: f64, full: f64, context: &str) {
    assert!(
        delta == full || (delta - full).abs() <= TOLERANCE,
        "{}: delta {} vs full {}",
        context,
        delta,
        full
    );
}

fn check_move_sequence(objective: &dyn Objective, data: &CoreHunterData, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = data.size();
    let mut subset = Subset::new(n, (0..n).filter(|_| rng.gen_bool(0.5))).unwrap();
    let mut eval = objective.evaluate(&subset, data).unwrap();
    for _ in 0..8 {
        let mv = random_move(&mut rng, &subset);
        let delta = objective.evaluate_delta(&mv, &subset, &eval, data).unwrap();
        subset.apply(&mv).unwrap();
        let full = objective.evaluate(&subset, data).unwrap();
        assert_close(
            delta.value(),
            full.value(),
            &format!("{} on {:?}", objective.name(), subset.selected()),
        );
        eval = delta;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_delta_matches_full_evaluation(seed in any::<u64>()) {
        let data = random_dataset(seed);
        for config in all_configs() {
            for cached in [false, true] {
                let cache = cached.then(|| Arc::new(DistanceCache::for_data(&data)));
                let objective = build_objective_with_cache(&config, &data, cache).unwrap();
                check_move_sequence(objective.as_ref(), &data, seed.wrapping_add(1));
            }
        }
    }

    #[test]
    fn test_weighted_delta_matches_full_evaluation(seed in any::<u64>()) {
        let data = random_dataset(seed);
        let mut configs = vec![
            ObjectiveConfig::new(ObjectiveType::AverageEntryToNearestEntry).with_weight(0.6),
            ObjectiveConfig::new(ObjectiveType::Shannon).with_weight(0.3),
            ObjectiveConfig::new(ObjectiveType::HeterozygousLoci).with_weight(0.1),
        ];
        configs[0].measure = Some(DistanceMeasureType::Gower);
        let objective = WeightedObjective::from_config(&configs, &data).unwrap();
        check_move_sequence(&objective, &data, seed ^ 0x5eed);
    }

    #[test]
    fn test_measures_symmetric_and_ceil_above_floor(seed in any::<u64>()) {
        let data = random_dataset(seed);
        for kind in [
            DistanceMeasureType::ModifiedRogers,
            DistanceMeasureType::CavalliSforzaEdwards,
            DistanceMeasureType::Gower,
            DistanceMeasureType::Precomputed,
        ] {
            let floor = build_measure(kind, MissingValuesPolicy::Floor);
            let ceil = build_measure(kind, MissingValuesPolicy::Ceil);
            for x in data.ids() {
                prop_assert_eq!(floor.distance(x, x, &data).unwrap(), 0.0);
                for y in data.ids() {
                    let d = floor.distance(x, y, &data).unwrap();
                    prop_assert!(d >= 0.0);
                    prop_assert_eq!(d, floor.distance(y, x, &data).unwrap());
                    prop_assert!(ceil.distance(x, y, &data).unwrap() >= d - TOLERANCE);
                }
            }
        }
    }

    #[test]
    fn test_cache_is_transparent(seed in any::<u64>()) {
        let data = random_dataset(seed);
        let cache = Arc::new(DistanceCache::for_data(&data));
        let measure = build_measure(DistanceMeasureType::ModifiedRogers, MissingValuesPolicy::Ceil);
        let cached = CachedDistance::new(
            build_measure(DistanceMeasureType::ModifiedRogers, MissingValuesPolicy::Ceil),
            Arc::clone(&cache),
        );
        for x in data.ids() {
            for y in data.ids() {
                let expected = measure.distance(x, y, &data).unwrap();
                prop_assert_eq!(cached.distance(x, y, &data).unwrap(), expected);
                prop_assert_eq!(cached.distance(x, y, &data).unwrap(), expected);
            }
        }

        let fresh = DistanceCache::for_data(&data);
        fresh.precompute(measure.as_ref(), &data).unwrap();
        for x in data.ids() {
            for y in 0..x {
                prop_assert_eq!(fresh.get(x, y), cache.get(x, y));
            }
        }
    }

    #[test]
    fn test_coverage_bounds(seed in any::<u64>()) {
        let data = random_dataset(seed);
        let coverage = build_objective_with_cache(
            &ObjectiveConfig::new(ObjectiveType::Coverage),
            &data,
            None,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let n = data.size();
        let subset = Subset::new(n, (0..n).filter(|_| rng.gen_bool(0.5))).unwrap();
        let value = coverage.evaluate(&subset, &data).unwrap().value();
        prop_assert!((0.0..=1.0).contains(&value));
        let full = coverage.evaluate(&Subset::full(n), &data).unwrap().value();
        prop_assert!(full >= value);
    }
}

#[test]
fn test_full_coverage_when_all_alleles_observed() {
    let headers: Vec<Header> = (0..3).map(|i| Header::named(format!("acc-{}", i))).collect();
    let genotypes = GenotypeData::new(
        headers,
        vec![Marker::with_allele_count(None, 3)],
        vec![
            vec![vec![Some(1.0), Some(0.0), Some(0.0)]],
            vec![vec![Some(0.0), Some(0.5), Some(0.5)]],
            vec![vec![None, None, None]],
        ],
    )
    .unwrap();
    let data = CoreHunterData::new(Some(genotypes), None, None).unwrap();
    let coverage = build_objective_with_cache(
        &ObjectiveConfig::new(ObjectiveType::Coverage),
        &data,
        None,
    )
    .unwrap();
    let value = coverage
        .evaluate(&Subset::new(3, [0, 1]).unwrap(), &data)
        .unwrap()
        .value();
    assert_eq!(value, 1.0);
}
