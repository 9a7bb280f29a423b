use clap::{Parser, Subcommand};
use std::time::Instant;

use rand::Rng;

use relnmt::backend::{get_device, MyBackend};
use relnmt::helpers::{self, batch_from_tokens, mask_from_lengths};
use relnmt::model::Nmt;
use relnmt::utils::{format_params, format_throughput};

#[derive(Parser)]
#[command(name = "relnmt")]
#[command(version = "0.1.0")]
#[command(about = "Relation-augmented recurrent NMT model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show model configuration and parameter count
    Info {
        #[arg(default_value = "base")]
        size: String,

        #[arg(long, default_value_t = 30_000)]
        src_vocab: usize,

        #[arg(long, default_value_t = 30_000)]
        trg_vocab: usize,
    },
    /// Time full forward passes over random token batches
    Bench {
        #[arg(default_value = "small")]
        size: String,

        #[arg(long, default_value_t = 1_000)]
        vocab: usize,

        #[arg(long, default_value_t = 20)]
        seq_len: usize,

        #[arg(long, default_value_t = 2)]
        batch: usize,

        #[arg(long, default_value_t = 10)]
        iterations: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info {
            size,
            src_vocab,
            trg_vocab,
        } => info(&size, src_vocab, trg_vocab),
        Commands::Bench {
            size,
            vocab,
            seq_len,
            batch,
            iterations,
        } => bench(&size, vocab, seq_len, batch, iterations),
    }
}

fn info(size: &str, src_vocab: usize, trg_vocab: usize) {
    let config = helpers::get_model_config(size);

    println!("===========================================================");
    println!("  Model: {}", size);
    println!("===========================================================");
    println!(
        "  Parameters: {}",
        format_params(config.num_parameters(src_vocab, trg_vocab))
    );
    println!("  src_wemb_size: {}", config.src_wemb_size);
    println!("  trg_wemb_size: {}", config.trg_wemb_size);
    println!("  enc_hid_size: {}", config.enc_hid_size);
    println!("  dec_hid_size: {}", config.dec_hid_size);
    println!("  align_size: {}", config.align_size);
    println!("  out_size: {}", config.out_size);
    println!("  relation_channels: {}", config.relation_channels);
    println!("  relation_kernels: {:?}", config.relation_kernels);
    println!("  relation_stages: {}", config.relation_stages);
    println!("  max_out: {}", config.max_out);
    println!("  Backend: {}", relnmt::backend_name());
    println!("===========================================================");
}

fn bench(size: &str, vocab: usize, seq_len: usize, batch: usize, iterations: usize) {
    println!("===========================================================");
    println!("  Forward-pass benchmark");
    println!("===========================================================");

    let device = get_device();
    let config = helpers::get_model_config(size);
    if let Err(e) = config.validate() {
        eprintln!("  {}", e);
        std::process::exit(1);
    }

    println!(
        "  Model: {} ({} params)",
        size,
        format_params(config.num_parameters(vocab, vocab))
    );
    println!("  Batch: {} x seq_len {}", batch, seq_len);
    println!("  Iterations: {}", iterations);
    println!("  Backend: {}", relnmt::backend_name());
    println!();

    let model: Nmt<MyBackend> = Nmt::new(&config, vocab, vocab, &device);

    let mut rng = rand::thread_rng();
    let rows: Vec<Vec<u32>> = (0..batch)
        .map(|_| (0..seq_len).map(|_| rng.gen_range(1..vocab as u32)).collect())
        .collect();
    let lengths: Vec<usize> = vec![seq_len; batch];

    let srcs = batch_from_tokens::<MyBackend>(&rows, &device).expect("batch build");
    let trgs = batch_from_tokens::<MyBackend>(&rows, &device).expect("batch build");
    let mask = mask_from_lengths::<MyBackend>(&lengths, seq_len, &device).expect("mask build");

    // Warmup
    println!("  Warmup...");
    let _ = model.forward(srcs.clone(), trgs.clone(), &mask, &mask);

    println!("  Benchmarking forward...");
    let start = Instant::now();
    for _ in 0..iterations {
        let logits = model.forward(srcs.clone(), trgs.clone(), &mask, &mask);
        // Force evaluation on lazy backends
        let _ = logits.sum().into_scalar();
    }
    let elapsed = start.elapsed().as_secs_f64();

    let tokens = (iterations * batch * (seq_len - 1)) as f64;
    println!();
    println!("  Total: {:.2}s", elapsed);
    println!("  Per pass: {:.1}ms", 1_000.0 * elapsed / iterations as f64);
    println!("  Throughput: {}", format_throughput(tokens / elapsed));
    println!("===========================================================");
}
