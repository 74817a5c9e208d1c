// src/main.rs
use clap::Parser;
use multipow::pow::{PowContext, seed_offset};
use multipow::types::{Algorithm, Uint256};
use multipow::utils::logging::init_bench_logging;
use multipow::{cli, config, utils};

/// Main entry point for the multipow tools
///
/// # Flow
/// 1. Parses command line arguments
/// 2. Delegates to the subcommand handler
/// 3. Propagates any errors upward
fn main() -> Result<(), utils::PowError> {
    let cli = cli::Commands::parse();

    match cli.action {
        cli::Action::Algo(opts) => lookup_algo(opts),
        cli::Action::Seed(opts) => inspect_seed(opts),
        cli::Action::Bench(opts) => run_benchmark(opts),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Resolves an algorithm from a name/alias or a version word and
/// prints its canonical name and version bits
fn lookup_algo(opts: cli::AlgoOptions) -> Result<(), utils::PowError> {
    let algo = if let Some(name) = opts.name {
        Algorithm::from_name(&name, Algorithm::Unknown)
    } else if let Some(bits) = opts.bits {
        let word = parse_u32(&bits)?;
        Algorithm::from_version(word)
    } else {
        return Err(utils::PowError::Input(
            "pass either --name or --bits".into(),
        ));
    };

    println!("{} (version bits {:#06x})", algo, algo.version_bits());
    Ok(())
}

/// Prints where the seed for a height comes from
fn inspect_seed(opts: cli::SeedOptions) -> Result<(), utils::PowError> {
    let epoch_length = match opts.epoch_length {
        Some(len) if len > 0 => len,
        Some(_) => return Err(utils::PowError::Input("epoch length must be nonzero".into())),
        None => config::load(&opts.config)?.consensus.epoch_length,
    };

    if opts.height < epoch_length {
        println!(
            "height {}: epoch 0, seed = initial seed",
            opts.height
        );
    } else {
        println!(
            "height {}: seed = merkle root of header at height {}",
            opts.height,
            seed_offset(opts.height, epoch_length)
        );
    }
    Ok(())
}

/// Benchmarks the memory-hard engine
///
/// Builds the engine from the given seed, then hashes an 80-byte blob
/// with an incrementing nonce for the requested duration, logging a
/// hashrate line every second.
fn run_benchmark(opts: cli::BenchOptions) -> Result<(), utils::PowError> {
    init_bench_logging();

    let seed = match opts.seed {
        Some(hex) => Uint256::from_hex(&hex)?,
        None => Uint256::ZERO,
    };

    let mut ctx = if opts.fast {
        PowContext::new_fast(seed)
    } else {
        PowContext::new_light(seed)
    };

    log::info!(
        "benchmarking memory-hard engine for {}s ({} mode, seed {})",
        opts.duration,
        if opts.fast { "fast" } else { "light" },
        seed
    );

    let mut blob = [0u8; 80];
    let mut nonce: u64 = 0;
    let mut total: u64 = 0;
    let mut window: u64 = 0;
    let start = std::time::Instant::now();
    let mut last_log = std::time::Instant::now();

    while start.elapsed().as_secs() < opts.duration {
        blob[72..80].copy_from_slice(&nonce.to_le_bytes());
        ctx.memory_hard_hash(&blob)?;
        nonce += 1;
        total += 1;
        window += 1;

        if last_log.elapsed().as_secs() >= 1 {
            log::debug!(
                "{:.1} H/s",
                window as f64 / last_log.elapsed().as_secs_f64()
            );
            window = 0;
            last_log = std::time::Instant::now();
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    log::info!("total hashes: {}", total);
    log::info!("average hashrate: {:.2} H/s", total as f64 / elapsed);

    ctx.shutdown();
    Ok(())
}

/// Writes a configuration template to disk
fn generate_config(opts: cli::ConfigOptions) -> Result<(), utils::PowError> {
    std::fs::write(opts.output, config::generate_template())?;
    Ok(())
}

/// Accepts `0x`-prefixed hex or plain decimal
fn parse_u32(s: &str) -> Result<u32, utils::PowError> {
    let parsed = if let Some(hex) = s.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|_| utils::PowError::Input(format!("not a version word: {}", s)))
}
