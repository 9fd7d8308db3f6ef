use clap::Parser;
use serde::Serialize;
use thunk_context::{context_keys, ContextError, Defaults, LazyContext, Result};
use tracing::Level;

context_keys! {
    /// Request-scoped values for the greeting demo.
    space Request: RequestFields {
        user => User: String,
        greeting => Greeting: String,
        visits => Visits: u32,
    }
}

/// Registers a greeting derived from `user`, rebinds `user`, and shows which
/// value the greeting reports before and after.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// User the greeting is registered against
    #[arg(long, default_value = "world")]
    user: String,
    /// User to rebind after the greeting is registered (optional)
    #[arg(long)]
    later: Option<String>,
    /// Freeze the greeting as a literal instead of a thunk
    #[arg(long)]
    eager: bool,
    /// Reset to defaults before the final read (optional flag)
    #[arg(long)]
    reset: bool,
    /// Log context operations to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize, Debug)]
struct Report {
    mode: &'static str,
    before: Option<String>,
    after: Option<String>,
    visits: Option<u32>,
    reset: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    after_reset: Option<Snapshot>,
}

/// Key values read back after a reset.
#[derive(Serialize, Debug, PartialEq)]
struct Snapshot {
    user: Option<String>,
    greeting: Option<String>,
    visits: Option<u32>,
}

fn non_blank(flag: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ContextError::InvalidArgument(format!(
            "{flag} must not be empty"
        )));
    }
    Ok(())
}

fn greeting_for(user: Option<String>) -> String {
    format!("hello, {}", user.unwrap_or_else(|| "nobody".to_string()))
}

fn run(args: &Args) -> Result<Report> {
    non_blank("--user", &args.user)?;
    if let Some(later) = &args.later {
        non_blank("--later", later)?;
    }

    let ctx = LazyContext::with_defaults(
        Defaults::<Request>::new()
            .literal::<User>("world".to_string())
            .literal::<Visits>(0),
    );
    ctx.set::<User>(args.user.clone());

    let mode = if args.eager {
        ctx.set::<Greeting>(greeting_for(ctx.get::<User>()));
        "eager"
    } else {
        let upstream = ctx.downgrade();
        ctx.set_thunk::<Greeting>(move || {
            if let Some(scope) = upstream.upgrade() {
                scope.set::<Visits>(scope.get::<Visits>().unwrap_or(0) + 1);
            }
            greeting_for(upstream.get::<User>())
        });
        "lazy"
    };

    let before = ctx.get::<Greeting>();
    if let Some(later) = &args.later {
        ctx.set::<User>(later.clone());
    }
    let after = ctx.get::<Greeting>();
    let visits = ctx.get::<Visits>();

    let after_reset = args.reset.then(|| {
        ctx.reset();
        Snapshot {
            user: ctx.get::<User>(),
            greeting: ctx.get::<Greeting>(),
            visits: ctx.get::<Visits>(),
        }
    });

    Ok(Report {
        mode,
        before,
        after,
        visits,
        reset: args.reset,
        after_reset,
    })
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    let level = if args.verbose { Level::TRACE } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let report = match run(&args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("failed to render report: {e}");
            std::process::exit(1);
        }
    }
}
