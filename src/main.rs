//! CREATE2 Salt Optimizer CLI
//!
//! Usage:
//!   salt_optimizer -d 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed -p beef
//!   salt_optimizer -d <deployer> -b 0x6080... -p cafe -s 1000 -n 3
//!   salt_optimizer -d <deployer> -p dead --recommend --goal gas --deploy

use std::process;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use salt_optimizer::deploy::{DeploymentSubmitter, SimulatedDeployer};
use salt_optimizer::format::{format_address, format_number};
use salt_optimizer::recommend::{
    verify_recommendation, RecommendationProvider, RecommendationRequest, SimulatedRecommender,
};
use salt_optimizer::{CandidateWindow, Config, ProgressSink, SearchRequest, SearchResult, WorkerPool};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("salt_optimizer=info")),
        )
        .init();

    let config = Config::parse();

    let request = match config.validate().and_then(|_| config.to_request()) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    println!("CREATE2 Salt Optimizer");
    println!("======================");
    println!("Deployer:   {}", request.deployer());
    println!("Init hash:  0x{}", hex::encode(request.bytecode_hash()));
    println!("Pattern:    {} (contains)", request.pattern());
    println!("Difficulty: {}", request.pattern().difficulty_description());
    println!("Start salt: {}", request.start_salt());
    println!("Workers:    {}", config.worker_count());
    println!("Target:     {} salt(s)", config.count);
    println!();

    if config.recommend {
        print_recommendations(&config, &request);
    }

    let pool = WorkerPool::new(config.worker_count())
        .report_interval(Duration::from_secs(config.report_interval));

    let token = pool.cancellation_token();
    ctrlc::set_handler(move || token.cancel()).expect("Error setting Ctrl-C handler");

    println!("Searching... (Press Ctrl+C to stop)\n");

    let window = CandidateWindow::new(config.show_candidates);
    let progress: Option<&dyn ProgressSink> = if config.show_candidates > 0 {
        Some(&window)
    } else {
        None
    };

    let mut found: Vec<SearchResult> = Vec::new();
    let mut next = request.clone();

    loop {
        match pool.search(&next, progress, None) {
            Ok(result) => {
                found.push(result);
                print_result(&result, found.len(), &window);
                window.clear();

                if config.count > 0 && found.len() >= config.count {
                    println!("\nTarget reached! Found {} salt(s).", found.len());
                    break;
                }
                match result.salt.checked_add(1) {
                    Some(salt) => next = next.start_at(salt),
                    None => {
                        println!("\nSalt space exhausted.");
                        break;
                    }
                }
            }
            Err(e) if e.is_cancelled() => {
                println!("\nStopped by user.");
                break;
            }
            Err(e) => {
                eprintln!("Search error: {}", e);
                process::exit(1);
            }
        }
    }

    if config.deploy {
        if let Some(first) = found.first() {
            simulate_deploy(&config, &request, first);
        }
    }

    println!("\n--- Final Statistics ---");
    println!("Total salts tried:  {}", format_number(pool.total_salts()));
    println!("Total matches:      {}", pool.total_matches());
    println!("Time elapsed:       {:.2}s", pool.elapsed().as_secs_f64());
    println!(
        "Average speed:      {}/s",
        format_number(pool.salts_per_second() as u64)
    );
}

fn print_result(result: &SearchResult, index: usize, window: &CandidateWindow) {
    let recent = window.snapshot();
    if !recent.is_empty() {
        println!("Recent candidates:");
        for candidate in &recent {
            println!(
                "  #{:<10} {:<20} {}",
                candidate.iteration,
                candidate.salt,
                format_address(&candidate.address.to_hex_prefixed())
            );
        }
    }
    println!("=== Match #{} ===", index);
    println!("Address:      {}", result.address_checksum());
    println!("Salt (hex):   {}", result.salt_hex());
    println!("Salt (dec):   {}", result.salt_decimal());
    println!("Salt (bytes32): {}", result.salt.to_hex_padded());
    println!("Iterations:   {}", result.iterations);
    println!();
}

fn print_recommendations(config: &Config, request: &SearchRequest) {
    let bytecode = match config.bytecode_bytes() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Recommendation skipped: {}", e);
            return;
        }
    };
    let mut rec_request =
        RecommendationRequest::new(request.pattern().clone(), *request.deployer(), bytecode);
    rec_request.goal = config.goal;

    match SimulatedRecommender::default().recommendations(&rec_request) {
        Ok(recs) => {
            println!("Recommendations (simulated):");
            for rec in &recs {
                let verified =
                    verify_recommendation(rec, request.deployer(), request.bytecode_hash());
                println!(
                    "  {} -> {}  confidence {:.2}  gas {}  {}",
                    rec.salt,
                    format_address(&rec.predicted_address.to_checksum()),
                    rec.confidence,
                    rec.gas_estimate.map_or("-".to_string(), |g| g.to_string()),
                    if verified { "verified" } else { "UNVERIFIED" }
                );
                if let Some(reason) = &rec.reasoning {
                    println!("      {}", reason);
                }
            }
            println!();
        }
        Err(e) => eprintln!("Recommendations unavailable: {}", e),
    }
}

fn simulate_deploy(config: &Config, request: &SearchRequest, result: &SearchResult) {
    let bytecode = match config.bytecode_bytes() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Deployment skipped: {}", e);
            return;
        }
    };
    match SimulatedDeployer::default().deploy(request.deployer(), &result.salt, &bytecode) {
        Ok(deployment) => {
            println!("\n=== Deployment (simulated) ===");
            println!("Tx hash:      {}", deployment.tx_hash_hex());
            println!("Address:      {}", deployment.address);
            if deployment.address != result.address {
                eprintln!("Warning: deployed address differs from the predicted address");
            }
        }
        Err(e) => eprintln!("Deployment failed: {}", e),
    }
}
