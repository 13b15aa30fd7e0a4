use clap::{Parser, Subcommand};
use std::process::ExitCode;
use twig::areas::repository::Repository;
use twig::errors::kind_of;

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small snapshot version-control system",
    long_about = "twig tracks whole-tree snapshots of a working directory as \
    content-addressed commits, with branches, a staging area, three-way merges \
    and push/fetch/pull between repositories on the local file system.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory \
        or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Stage files for addition")]
    Add {
        #[arg(required = true, help = "Files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stage a tracked file for removal",
        long_about = "This command unstages a file staged for addition. A file tracked by the \
        current commit is staged for removal and deleted from the working directory."
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the \
        specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the IDs of all commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout -- <file> restores a file from the current commit, \
        checkout <commit> -- <file> restores it from the given commit, and \
        checkout <branch> switches to a branch."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch to switch to, or commit to restore from")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "File to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "reset", about = "Check out a commit and move the current branch to it")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(
        name = "add-remote",
        about = "Register another repository's .twig directory as a remote"
    )]
    AddRemote {
        #[arg(index = 1)]
        name: String,
        #[arg(index = 2)]
        path: String,
    },
    #[command(name = "rm-remote", about = "Remove a remote")]
    RmRemote {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "push", about = "Append the current history to a remote branch")]
    Push {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "fetch", about = "Copy a remote branch into <remote>/<branch>")]
    Fetch {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "pull", about = "Fetch a remote branch and merge it")]
    Pull {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
}

fn open_repository(path: Option<&str>) -> anyhow::Result<Repository> {
    match path {
        Some(path) => Repository::new(path, Box::new(std::io::stdout())),
        None => {
            let pwd = std::env::current_dir()?;
            Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut repository = match &cli.command {
        Commands::Init { path } => open_repository(path.as_deref())?,
        _ => open_repository(None)?,
    };

    match cli.command {
        Commands::Init { .. } => repository.init().await?,
        Commands::Add { paths } => repository.add(&paths).await?,
        Commands::Rm { file } => repository.remove(&file).await?,
        Commands::Commit { message } => repository.commit(&message).await?,
        Commands::Log => repository.log().await?,
        Commands::GlobalLog => repository.global_log().await?,
        Commands::Find { message } => repository.find(&message).await?,
        Commands::Status => repository.status().await?,
        Commands::Checkout { target, file } => match (target, file) {
            (None, Some(file)) => repository.checkout_file(&file).await?,
            (Some(commit), Some(file)) => repository.checkout_file_from(&commit, &file).await?,
            (Some(branch), None) => repository.checkout_branch(&branch).await?,
            (None, None) => anyhow::bail!("Incorrect operands."),
        },
        Commands::Branch { name } => repository.branch(&name)?,
        Commands::RmBranch { name } => repository.delete_branch(&name)?,
        Commands::Reset { commit } => repository.reset(&commit).await?,
        Commands::Merge { branch } => {
            repository.merge(&branch).await?;
        }
        Commands::AddRemote { name, path } => repository.add_remote(&name, &path).await?,
        Commands::RmRemote { name } => repository.remove_remote(&name).await?,
        Commands::Push { remote, branch } => repository.push(&remote, &branch).await?,
        Commands::Fetch { remote, branch } => repository.fetch(&remote, &branch).await?,
        Commands::Pull { remote, branch } => {
            repository.pull(&remote, &branch).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // user errors are reported as a plain sentence on stdout
            match kind_of(&error) {
                Some(kind) => println!("{}", kind),
                None => eprintln!("fatal: {:#}", error),
            }
            ExitCode::FAILURE
        }
    }
}
