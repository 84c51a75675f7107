// Separately:
// CPU: --speed instructions per second (700 by default)
// Display: 60 times per second
// Timer: 60 times per second

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use yac8::settings::{DEFAULT_INSTRUCTIONS_PER_SECOND, DEFAULT_SCALE};
use yac8::{disassembler, Rom, Settings};

mod frontend;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter and disassembler", long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom_path: Option<PathBuf>,

    /// Write the disassembly to this file instead of stdout
    asm_output: Option<PathBuf>,

    /// Disassemble the ROM instead of running it
    #[arg(short = 'd')]
    disassemble: bool,

    /// Also print a hex dump of the ROM when disassembling
    #[arg(long)]
    hex_dump: bool,

    /// Show the register/stack/instruction panel (F1 step, F2 run/pause)
    #[arg(long)]
    debug: bool,

    /// Window pixels per CHIP-8 pixel
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: usize,

    /// Instructions per second
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND)]
    speed: u32,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("yac8=info"))
        .init();

    let args = Args::parse();
    let Some(rom_path) = args.rom_path.clone() else {
        eprintln!("error: no ROM path given\n");
        Args::command().print_help()?;
        return Ok(ExitCode::from(1));
    };

    let rom = Rom::from_file(&rom_path)?;

    if args.disassemble {
        write_listing(&rom, args.asm_output.as_deref(), args.hex_dump)?;
        return Ok(ExitCode::SUCCESS);
    }

    let settings = Settings::new(rom_path)
        .with_scale(args.scale)
        .with_speed(args.speed)
        .with_debug(args.debug);
    log::info!(
        "running {} at {} instructions/s, scale {}",
        settings.rom_path.display(),
        settings.instructions_per_second,
        settings.scale
    );
    frontend::run(&settings, &rom)?;
    Ok(ExitCode::SUCCESS)
}

fn write_listing(rom: &Rom, asm_output: Option<&Path>, hex_dump: bool) -> anyhow::Result<()> {
    match asm_output {
        Some(path) => {
            log::info!("saving ASM to '{}'", path.display());
            let file = File::create(path)
                .with_context(|| format!("could not create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            disassembler::disassemble(rom, &mut out)?;
            out.flush()?;
        }
        None => disassembler::disassemble(rom, &mut io::stdout().lock())?,
    }

    if hex_dump {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "\nHEX DUMP")?;
        disassembler::hex_dump(rom, &mut stdout)?;
    }
    Ok(())
}
