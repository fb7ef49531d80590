use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path of the config file, the default value is $HOME/.alerton.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host named in the alert, the default value is this machine's hostname.
    #[arg(long)]
    pub host: Option<String>,

    /// Title of the alert.
    pub title: String,

    /// Alert body, words are joined with spaces.
    pub body: Vec<String>,
}

impl Args {
    pub fn body(&self) -> String {
        self.body.join(" ")
    }
}
