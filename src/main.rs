//! Core Hunter CLI - Select a core collection from a JSON run file.

use std::fs;
use std::path::PathBuf;

use corehunter::{
    compute::search,
    data::{Header, Marker},
    schema::{
        CoreHunterConfig, DatasetInput, DistanceMatrixInput, GenotypeInput, GenotypeValues,
        ObjectiveConfig, ObjectiveType, RunInput, SearchConfig, SizeBounds,
    },
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <run.json>", args[0]);
        eprintln!();
        eprintln!("Select a core collection as configured in a JSON run file.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  run.json  Path to a file with \"dataset\" and \"config\" sections");
        eprintln!();
        eprintln!("An example run file is generated with the --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_run();
        return;
    }

    let run_path = PathBuf::from(&args[1]);

    let run_str = fs::read_to_string(&run_path).unwrap_or_else(|e| {
        eprintln!("Error reading run file: {}", e);
        std::process::exit(1);
    });

    let input: RunInput = serde_json::from_str(&run_str).unwrap_or_else(|e| {
        eprintln!("Error parsing run file: {}", e);
        std::process::exit(1);
    });

    let result = search::run(input).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            std::process::exit(1);
        }
    }
}

fn example_run() -> RunInput {
    let headers: Vec<Header> = ["acc-1", "acc-2", "acc-3", "acc-4"]
        .into_iter()
        .map(Header::named)
        .collect();

    let genotypes = GenotypeInput {
        headers: headers.clone(),
        markers: vec![
            Marker::new(Some("m1".into()), vec!["A".into(), "C".into()]),
            Marker::new(Some("m2".into()), vec!["G".into(), "T".into(), "-".into()]),
        ],
        values: GenotypeValues::Observations {
            ploidy: 2,
            alleles: vec![
                vec![Some(vec![0, 0]), Some(vec![0, 1])],
                vec![Some(vec![0, 1]), Some(vec![1, 1])],
                vec![Some(vec![1, 1]), None],
                vec![Some(vec![1, 1]), Some(vec![2, 2])],
            ],
        },
    };

    let distances = DistanceMatrixInput {
        headers,
        matrix: vec![
            vec![0.0, 0.3, 0.8, 0.9],
            vec![0.3, 0.0, 0.6, 0.7],
            vec![0.8, 0.6, 0.0, 0.4],
            vec![0.9, 0.7, 0.4, 0.0],
        ],
    };

    RunInput {
        dataset: DatasetInput {
            genotypes: Some(genotypes),
            phenotypes: None,
            distances: Some(distances),
        },
        config: CoreHunterConfig {
            subset_size: SizeBounds::fixed(2),
            objectives: vec![
                ObjectiveConfig::new(ObjectiveType::AverageEntryToNearestEntry).with_weight(0.7),
                ObjectiveConfig::new(ObjectiveType::Coverage).with_weight(0.3),
            ],
            search: SearchConfig::default(),
            random_seed: Some(42),
        },
    }
}

fn print_example_run() {
    match serde_json::to_string_pretty(&example_run()) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example: {}", e),
    }
}
