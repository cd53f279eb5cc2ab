mod render;

use std::process::ExitCode;

use clap::Parser;
use harbor_api::{Credentials, GcRemote, HarborClient, RequestContext};
use harbor_config::{resolve_settings, Cli, Commands, GcCommand, OutputFormat, ScheduleArgs};
use harbor_gc::{build_schedule, GcService, ScheduleDescriptor};
use harbor_models::gc::{GcParameters, HistoryQuery};
use harbor_utilities::startup::startup;
use log::debug;

type DynError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = startup("harbor", cli.global.verbose, cli.global.log_file.as_deref()) {
        eprintln!("Failed to initialise logging: {err}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("{err:?}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), DynError> {
    let settings = resolve_settings(&cli.global)?;
    debug!("Using Harbor server {}", settings.server);

    let credentials = settings
        .credentials
        .clone()
        .map(|(username, password)| Credentials::new(username, password));
    let ctx = RequestContext::new(&settings.server, credentials)?;
    let service = GcService::new(HarborClient::with_timeout(settings.timeout)?);

    match cli.command {
        Commands::Gc(command) => run_gc(&service, &ctx, command, settings.output),
    }
}

fn run_gc<R>(
    service: &GcService<R>,
    ctx: &RequestContext,
    command: GcCommand,
    output: OutputFormat,
) -> Result<(), DynError>
where
    R: GcRemote,
{
    match command {
        GcCommand::Create(args) => {
            let (schedule, parameters) = schedule_input(&args)?;
            service.create(ctx, &schedule, &parameters)?;
            println!("GC schedule created: {schedule}");
        }
        GcCommand::Update(args) => {
            let (schedule, parameters) = schedule_input(&args)?;
            service.update(ctx, &schedule, &parameters)?;
            println!("GC schedule updated: {schedule}");
        }
        GcCommand::Schedule => {
            let snapshot = service.get(ctx)?;
            render::schedule(&snapshot, output)?;
        }
        GcCommand::History(args) => {
            let query = HistoryQuery {
                page: args.page,
                page_size: args.page_size,
                query: args.query,
                sort: args.sort,
            };
            let page = service.history(ctx, &query)?;
            render::history(&page, output)?;
        }
        GcCommand::Status(args) => {
            let execution = service.status(ctx, args.gc_id)?;
            render::execution(&execution, output)?;
        }
        GcCommand::Log(args) => {
            let log = service.log(ctx, args.gc_id)?;
            print!("{log}");
        }
        GcCommand::Stop(args) => {
            service.stop(ctx, args.gc_id)?;
            println!("GC execution {} stopped", args.gc_id);
        }
    }
    Ok(())
}

fn schedule_input(args: &ScheduleArgs) -> Result<(ScheduleDescriptor, GcParameters), DynError> {
    let schedule = build_schedule(
        &args.schedule_type,
        &args.cron,
        args.next_scheduled_time.as_deref(),
    )?;
    let parameters = GcParameters {
        delete_untagged: args.delete_untagged,
        dry_run: args.dry_run,
        workers: args.workers,
    };
    Ok((schedule, parameters))
}
