use std::{io::Write, path::Path, process};

use vitae::{
    application::{
        blog::BlogRenderer,
        contact::ContactWiring,
        error::AppError,
        publications::PublicationsLoader,
        site::{SectionIds, SiteAssembler},
    },
    config::{self, PostsArgs, RenderArgs, Settings},
    domain::posts::{ISO_DATE_FORMAT, sort_descending_by_date},
    infra::{self, error::InfraError, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(error = %report.chain(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %report.chain(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    match cli_args.command {
        config::Command::Render(args) => run_render(settings, *args).await,
        config::Command::Posts(args) => run_posts(settings, args).await,
    }
}

async fn run_render(settings: Settings, args: RenderArgs) -> Result<(), AppError> {
    let assembler = build_assembler(&settings)?;

    let page = tokio::fs::read_to_string(&args.page)
        .await
        .map_err(|err| {
            AppError::unexpected(format!(
                "failed to read page `{}`: {err}",
                args.page.display()
            ))
        })?;

    let assembled = assembler.initialize(&page).await?;

    match args.output.as_deref() {
        Some(path) => {
            write_page(path, &assembled.html).await?;
            info!(output = %path.display(), "wrote assembled page");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(assembled.html.as_bytes())
                .map_err(InfraError::from)?;
            stdout.flush().map_err(InfraError::from)?;
        }
    }

    Ok(())
}

async fn run_posts(settings: Settings, _args: PostsArgs) -> Result<(), AppError> {
    let assembler = build_assembler(&settings)?;
    let posts = sort_descending_by_date(assembler.blog().fetch_posts().await?);

    let mut stdout = std::io::stdout().lock();
    for post in &posts {
        let date = post
            .published_on()
            .and_then(|date| date.format(ISO_DATE_FORMAT).ok())
            .unwrap_or_else(|| post.date.trim().to_string());
        writeln!(stdout, "{date}\t{}", post.title).map_err(InfraError::from)?;
    }
    stdout.flush().map_err(InfraError::from)?;

    info!(count = posts.len(), "listed blog index");
    Ok(())
}

fn build_assembler(settings: &Settings) -> Result<SiteAssembler, AppError> {
    let source = infra::resource_source(&settings.source)?;

    let blog = BlogRenderer::new(source.clone())
        .with_index_path(settings.content.blog_index.clone())
        .with_empty_message(settings.messages.blog_empty.clone());
    let publications = PublicationsLoader::new(source)
        .with_path(settings.content.publications.clone())
        .with_unavailable_message(settings.messages.publications_unavailable.clone());
    let contact = settings.contact.clone().map(|email| {
        ContactWiring::new(email).with_ids(
            settings.page.email_link.clone(),
            settings.page.email_contact.clone(),
        )
    });

    Ok(SiteAssembler::new(blog, publications)
        .with_contact(contact)
        .with_sections(SectionIds {
            publications: settings.page.publications_container.clone(),
            blog: settings.page.blog_container.clone(),
        }))
}

async fn write_page(path: &Path, html: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(InfraError::from)?;
    }
    tokio::fs::write(path, html)
        .await
        .map_err(InfraError::from)?;
    Ok(())
}
