use std::borrow::Cow;
use std::env;
use std::ffi::OsString;
use std::fs::File;

use env_logger;
use tnef2attach::{extract, ComplianceMode, TnefError};
use tnef2attach::tnef::value::DEFAULT_CODEPAGE;


struct Options {
    mode: ComplianceMode,
    codepage: u16,
    path: OsString,
}


fn parse_args(args: &[OsString]) -> Option<Options> {
    let mut mode = ComplianceMode::Loose;
    let mut codepage = DEFAULT_CODEPAGE;
    let mut path = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--strict" {
            mode = ComplianceMode::Strict;
        } else if arg == "--codepage" {
            codepage = iter.next()?
                .to_str()?
                .parse().ok()?;
        } else if path.is_none() {
            path = Some(arg.clone());
        } else {
            return None;
        }
    }

    Some(Options { mode, codepage, path: path? })
}


fn run() -> i32 {
    let args: Vec<OsString> = env::args_os().collect();
    let Some(options) = parse_args(&args) else {
        let arg0 = args
            .get(0)
            .map(|a| a.to_string_lossy())
            .unwrap_or(Cow::Borrowed("tnef2attach"));
        eprintln!("Usage: {} [--strict] [--codepage CODEPAGE] WINMAIL.DAT", arg0);
        return 1;
    };

    env_logger::init();

    let file = match File::open(&options.path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("failed to open {}: {}", options.path.to_string_lossy(), e);
            return 1;
        },
    };

    let (attachments, status) = match extract(file, options.codepage, options.mode) {
        Ok(result) => result,
        Err(e @ TnefError::Compliance { .. }) => {
            eprintln!("{}", e);
            return 2;
        },
        Err(e) => {
            eprintln!("failed to read TNEF: {}", e);
            return 1;
        },
    };

    for (i, attachment) in attachments.iter().enumerate() {
        println!(
            "{}: {:?} {:?} {} {} bytes {}",
            i,
            attachment.kind,
            attachment.filename.as_deref().unwrap_or(""),
            attachment.content_type.mime_type,
            attachment.body_len(),
            attachment.content_disposition.disposition_type(),
        );
    }
    if status.is_compliant() {
        println!("compliance: OK");
    } else {
        println!("compliance: {:?}", status);
    }

    0
}


fn main() {
    std::process::exit(run());
}
