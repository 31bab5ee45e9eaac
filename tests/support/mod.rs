#![cfg(unix)]
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::rc::Rc;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;
use tii::{CacheStore, CommandRunner, PackageIndex};

pub fn tii_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tii"))
}

pub fn sample_index() -> PackageIndex {
    PackageIndex::from([
        ("fish", "User-friendly command-line shell for UNIX-like operating systems"),
        ("fishnet", "Distributed Stockfish analysis for lichess.org"),
        ("cowsay", "Configurable talking characters in ASCII art"),
    ])
}

// Temporary data root plus a bin dir holding a stub `brew` that records its
// arguments into MARK_FILE.
pub struct Sandbox {
    pub temp: TempDir,
    pub data_root: PathBuf,
    pub bin_dir: PathBuf,
    pub marker: PathBuf,
}

impl Sandbox {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("failed to allocate sandbox")?;
        let data_root = temp.path().join("data");
        let bin_dir = temp.path().join("bin");
        fs::create_dir_all(&data_root)?;
        fs::create_dir_all(&bin_dir)?;
        let marker = temp.path().join("brew_invoked");
        let sandbox = Self {
            temp,
            data_root,
            bin_dir,
            marker,
        };
        sandbox.install_stub("brew", "#!/bin/sh\necho \"$@\" > \"$MARK_FILE\"\n")?;
        Ok(sandbox)
    }

    pub fn install_stub(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.bin_dir.join(name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write stub {}", path.display()))?;
        make_executable(&path)?;
        Ok(path)
    }

    pub fn remove_stub(&self, name: &str) -> Result<()> {
        fs::remove_file(self.bin_dir.join(name)).context("removing stub")
    }

    pub fn store(&self) -> CacheStore {
        CacheStore::new(&self.data_root)
    }

    pub fn seed_cache(&self, index: &PackageIndex) -> Result<()> {
        self.store().store(index).context("seeding cache")
    }

    /// `tii` with a scrubbed environment pointing at this sandbox.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(tii_binary());
        cmd.env_clear()
            .env("HOME", self.temp.path())
            .env("XDG_DATA_HOME", &self.data_root)
            .env("PATH", &self.bin_dir)
            .env("SHELL", "/bin/sh")
            .env("MARK_FILE", &self.marker)
            .stdin(Stdio::null());
        cmd
    }

    pub fn brew_invocation(&self) -> Option<String> {
        fs::read_to_string(&self.marker)
            .ok()
            .map(|s| s.trim().to_string())
    }
}

pub fn make_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

// Records commands instead of running them.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    pub commands: Rc<RefCell<Vec<String>>>,
    pub fail: bool,
}

impl RecordingRunner {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &str) -> tii::Result<()> {
        self.commands.borrow_mut().push(command.to_string());
        if self.fail {
            return Err(tii::Error::Exec {
                command: command.to_string(),
                message: "exited with status 1".to_string(),
            });
        }
        Ok(())
    }
}

// Write sink whose contents can be read after the session is dropped.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// Minimal HTTP server answering `requests` connections. Paths missing from
// `routes` get a 404.
pub struct CatalogServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl CatalogServer {
    pub fn start(routes: Vec<(&'static str, String)>, requests: usize) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").context("binding catalog server")?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let handle = thread::spawn(move || {
            for stream in listener.incoming().take(requests) {
                let Ok(stream) = stream else { continue };
                let mut reader = BufReader::new(&stream);
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) | Err(_) => break,
                        Ok(_) if header.trim().is_empty() => break,
                        Ok(_) => {}
                    }
                }
                let path = request_line.split_whitespace().nth(1).unwrap_or("/");
                let response = match routes.iter().find(|(route, _)| *route == path) {
                    Some((_, body)) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = (&stream).write_all(response.as_bytes());
            }
        });
        Ok(Self { base_url, handle })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn join(self) {
        let _ = self.handle.join();
    }
}
