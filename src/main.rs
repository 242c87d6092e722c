use clap::Parser;
use futures::future::BoxFuture;
use kube::Client;
use shears::list::KubeLister;
use shears::{AnalyzeOpts, DeleteWorkflow, Outcome, Prompt};
use std::io::{self, Write};

/// Inspect what depends on a cluster resource before deleting it
#[derive(Parser)]
#[clap(version = "0.1.0")]
struct Opts {
    /// Resource kind, e.g. configmap
    kind: String,
    /// Resource name
    name: String,
    #[clap(short, long)]
    namespace: Option<String>,
    /// Proceed even when blocking dependencies are found
    #[clap(long)]
    force: bool,
    /// Skip the confirmation prompt
    #[clap(short = 'y', long)]
    yes: bool,
    /// Analyze and report only, never delete
    #[clap(long)]
    dry_run: bool,
}

fn render(prompt: &Prompt) {
    println!("{}", prompt.title);
    for section in &prompt.sections {
        println!();
        println!("{}:", section.heading);
        for line in &section.lines {
            println!("  - {}", line);
        }
    }
}

fn ask() -> bool {
    print!("Proceed? [y/N] ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts: Opts = Opts::parse();

    let client = Client::try_default().await?;
    let lister = KubeLister::discover(client).await?;
    let target = lister
        .get_object(&opts.kind, &opts.name, opts.namespace.as_deref())
        .await?;

    let deleter = lister.clone();
    let kind = opts.kind.clone();
    let name = opts.name.clone();
    let namespace = opts.namespace.clone();
    let auto_confirm = opts.yes;
    let dry_run = opts.dry_run;

    let workflow = DeleteWorkflow::new(lister);
    let outcome = workflow
        .run(
            &target,
            AnalyzeOpts { force: opts.force },
            move |prompt: Prompt| -> BoxFuture<'static, bool> {
                Box::pin(async move {
                    render(&prompt);
                    if dry_run {
                        println!("(dry run, not deleting)");
                        return false;
                    }
                    auto_confirm || ask()
                })
            },
            move || -> BoxFuture<'static, anyhow::Result<()>> {
                Box::pin(async move {
                    deleter
                        .delete_object(&kind, &name, namespace.as_deref())
                        .await?;
                    Ok(())
                })
            },
        )
        .await?;

    match outcome {
        Outcome::Committed => {
            println!("deleted {} {}", opts.kind, opts.name);
        }
        Outcome::Aborted => {
            if !dry_run {
                println!("aborted");
            }
        }
        Outcome::Blocked(prompt) => {
            render(&prompt);
            println!();
            println!("Rerun with --force to delete anyway.");
            std::process::exit(1);
        }
        Outcome::Stale => {}
    }
    Ok(())
}
