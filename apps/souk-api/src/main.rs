use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = souk_api::Args::parse();

	souk_api::run(args).await
}
