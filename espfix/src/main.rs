use env_logger::Env;
use espfix::{
    chip::{ChipKind, ChipProfile, MemoryMap},
    fix_file, Error,
};
use std::{fs::read, path::PathBuf, process::exit};
use structopt::StructOpt;

#[derive(StructOpt)]
struct AppImageOpt {
    /// Application partition image
    #[structopt(parse(from_os_str))]
    filename: PathBuf,
}

#[derive(StructOpt)]
enum Command {
    /// Fix all checksums in application partition image file
    #[structopt(name = "app_image")]
    AppImage(AppImageOpt),
}

#[derive(StructOpt)]
#[structopt(about = "ESP32 application image fixer")]
struct Opt {
    /// Target chip type
    #[structopt(short, long, default_value = "esp32", possible_values = ChipKind::VARIANTS)]
    chip: ChipKind,
    /// Path to a memory map toml replacing the chip's built-in one
    #[structopt(long, parse(from_os_str))]
    memory_map: Option<PathBuf>,
    #[structopt(subcommand)]
    cmd: Option<Command>,
}

impl Opt {
    fn profile(&self) -> Result<ChipProfile, Error> {
        match &self.memory_map {
            Some(path) => {
                let memory_map = MemoryMap::from_slice(&read(path)?)?;
                Ok(ChipProfile::new(self.chip.chip(), memory_map))
            }
            None => self.chip.profile(),
        }
    }
}

fn app_image(profile: &ChipProfile, opt: &AppImageOpt) -> Result<(), Error> {
    log::info!("Chip: {}", profile.name);
    fix_file(profile, &opt.filename)?;
    log::info!("Success");

    Ok(())
}

fn run(args: &Opt, cmd: &Command) -> Result<(), Error> {
    let profile = args.profile()?;

    match cmd {
        Command::AppImage(opt) => app_image(&profile, opt)?,
    };

    Ok(())
}

#[paw::main]
fn main(args: Opt) {
    env_logger::Builder::from_env(Env::default().default_filter_or("espfix=info"))
        .format_timestamp(None)
        .init();

    let cmd = match &args.cmd {
        Some(cmd) => cmd,
        None => {
            log::warn!("Wrong arguments!!!");
            if let Err(e) = Opt::clap().print_help() {
                log::error!("{}", e);
            }
            println!();
            return;
        }
    };

    if let Err(e) = run(&args, cmd) {
        log::error!("A fatal error occurred: {}", e);
        exit(2);
    }
}
