use clap::{Parser, Subcommand};
use financial_table_qa::{
    evaluate, load_dataset, run_server, write_report, ChatClient, EvaluationReport,
    EvaluationResult, Provider, Result,
};
use std::path::PathBuf;

/// Answer quantitative questions over financial tables with an LLM backend.
#[derive(Parser, Debug)]
#[command(name = "ftqa", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Evaluate provider accuracy over a question/answer dataset
    Evaluate {
        /// Path to the dataset (JSON array of records)
        #[arg(long)]
        dataset: PathBuf,

        /// Comma-separated provider names (Groq, OpenAI)
        #[arg(long, default_value = "Groq")]
        providers: String,

        /// Where to write the JSON report
        #[arg(long, default_value = "evaluation_results.json")]
        output: PathBuf,

        /// Limit the number of records evaluated
        #[arg(long)]
        max_records: Option<usize>,
    },
    /// Serve the HTTP analysis endpoint
    Serve {
        #[arg(long, default_value = "0.0.0.0:8000")]
        addr: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    match Cli::parse().cmd {
        Cmd::Evaluate {
            dataset,
            providers,
            output,
            max_records,
        } => run_evaluation(&dataset, &providers, &output, max_records).await,
        Cmd::Serve { addr } => run_server(&addr).await,
    }
}

async fn run_evaluation(
    dataset_path: &PathBuf,
    providers: &str,
    output: &PathBuf,
    max_records: Option<usize>,
) -> Result<()> {
    let mut dataset = load_dataset(dataset_path)?;
    if let Some(limit) = max_records {
        dataset.truncate(limit);
    }
    println!("Loaded {} records", dataset.len());

    let mut report = EvaluationReport::new();

    for name in providers.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let provider = Provider::from_name(name);
        println!("\nEvaluating {} model...", provider.name());

        let gateway = ChatClient::for_provider(provider)?;
        let result = evaluate(&dataset, &gateway).await;

        print_summary(provider.name(), &result);
        report.results.insert(provider.name().to_string(), result);
    }

    write_report(output, &report)?;
    println!("\nDetailed results saved to {}", output.display());
    Ok(())
}

fn print_summary(provider: &str, result: &EvaluationResult) {
    println!("\n{} Results:", provider);
    println!("Total Questions: {}", result.total_questions);
    println!("Successfully Processed: {}", result.processed_questions);
    println!("Correct Answers: {}", result.correct_answers);
    println!("Accuracy (of processed): {:.2}%", result.accuracy * 100.0);
    println!(
        "Processing Success Rate: {:.2}%",
        result.successful_processing_rate * 100.0
    );
    println!("Error Rate: {:.2}%", result.error_rate * 100.0);
    println!("Number of Errors: {}", result.errors.len());

    if !result.incorrect_answers.is_empty() {
        println!("\nSample Incorrect Predictions:");
        for (i, incorrect) in result.incorrect_answers.iter().take(5).enumerate() {
            println!("\nQuestion {}: {}", i + 1, incorrect.question);
            println!("Predicted: {}", incorrect.predicted);
            println!("Actual: {}", incorrect.actual);
        }
    }
}
