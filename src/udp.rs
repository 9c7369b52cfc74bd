// UDP send/receive helper for the external experiment client.
//
// One socket sends to the configured server endpoint; a second socket is
// bound locally and drained by a background listener thread that hands each
// datagram to the registered callback. A misbehaving callback is contained
// at the call site so the listener keeps delivering.

use std::net::{SocketAddr, UdpSocket};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest datagram the listener accepts.
pub const MAX_DATAGRAM: usize = 1024;

const RECV_TIMEOUT: Duration = Duration::from_millis(250);

/// Endpoint record from the settings file. All four fields are required
/// when the record is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UdpConfig {
    pub server_ip: String,
    pub server_port: u16,
    pub client_ip: String,
    pub client_port: u16,
}

#[derive(Debug, Error)]
pub enum UdpError {
    #[error("missing UDP configuration: {0}")]
    Config(&'static str),
    #[error("server endpoint is not configured")]
    NotConfigured,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type DataHandler = Box<dyn Fn(&[u8]) + Send + Sync>;

pub struct UdpService {
    config: UdpConfig,
    send_socket: UdpSocket,
    recv_socket: Arc<UdpSocket>,
    handler: Arc<Mutex<Option<DataHandler>>>,
    stop: Arc<AtomicBool>,
    listener: Option<thread::JoinHandle<()>>,
}

impl UdpService {
    /// Bind the local sockets described by the configuration.
    pub fn new(config: UdpConfig) -> Result<Self, UdpError> {
        if config.client_ip.is_empty() {
            return Err(UdpError::Config("client bind address"));
        }

        let send_socket = UdpSocket::bind(("0.0.0.0", 0))?;
        let recv_socket = UdpSocket::bind((config.client_ip.as_str(), config.client_port))?;
        recv_socket.set_read_timeout(Some(RECV_TIMEOUT))?;

        Ok(Self {
            config,
            send_socket,
            recv_socket: Arc::new(recv_socket),
            handler: Arc::new(Mutex::new(None)),
            stop: Arc::new(AtomicBool::new(false)),
            listener: None,
        })
    }

    /// Address the listener socket actually bound to.
    pub fn recv_addr(&self) -> std::io::Result<SocketAddr> {
        self.recv_socket.local_addr()
    }

    /// Send a datagram to the configured server endpoint.
    pub fn send(&self, data: &[u8]) -> Result<(), UdpError> {
        if self.config.server_ip.is_empty() || self.config.server_port == 0 {
            return Err(UdpError::NotConfigured);
        }

        self.send_socket
            .send_to(data, (self.config.server_ip.as_str(), self.config.server_port))?;
        Ok(())
    }

    /// Register the callback invoked once per received datagram.
    pub fn set_data_handler(&self, handler: impl Fn(&[u8]) + Send + Sync + 'static) {
        *self.handler.lock().unwrap() = Some(Box::new(handler));
    }

    /// Start the background listener thread. A second call is a no-op.
    pub fn start_receiving(&mut self) {
        if self.listener.is_some() {
            log::warn!("UDP listener is already running");
            return;
        }

        self.stop.store(false, Ordering::Relaxed);
        let socket = self.recv_socket.clone();
        let handler = self.handler.clone();
        let stop = self.stop.clone();

        self.listener = Some(thread::spawn(move || {
            let mut buf = [0u8; MAX_DATAGRAM];
            while !stop.load(Ordering::Relaxed) {
                match socket.recv_from(&mut buf) {
                    Ok((len, _addr)) => {
                        if let Some(handler) = handler.lock().unwrap().as_ref() {
                            let data = &buf[..len];
                            if catch_unwind(AssertUnwindSafe(|| handler(data))).is_err() {
                                log::error!("error in data handler callback");
                            }
                        }
                    }
                    Err(e)
                        if e.kind() == std::io::ErrorKind::WouldBlock
                            || e.kind() == std::io::ErrorKind::TimedOut => {}
                    Err(e) => {
                        log::error!("error receiving UDP data: {}", e);
                    }
                }
            }
            log::debug!("UDP listener thread exited");
        }));
        log::info!("UDP listener thread started");
    }

    /// Stop the listener and release it. Idempotent; the join is bounded by
    /// the socket read timeout.
    pub fn close(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.listener.take() {
            if handle.join().is_err() {
                log::error!("UDP listener thread panicked");
            }
            log::info!("UDP service closed");
        }
    }
}

impl Drop for UdpService {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn loopback_config() -> UdpConfig {
        UdpConfig {
            server_ip: String::new(),
            server_port: 0,
            client_ip: "127.0.0.1".to_string(),
            client_port: 0,
        }
    }

    #[test]
    fn send_fails_when_server_is_not_configured() {
        let service = UdpService::new(loopback_config()).unwrap();
        assert!(matches!(service.send(b"ping"), Err(UdpError::NotConfigured)));
    }

    #[test]
    fn empty_client_address_is_rejected() {
        let config = UdpConfig {
            client_ip: String::new(),
            ..loopback_config()
        };
        assert!(matches!(UdpService::new(config), Err(UdpError::Config(_))));
    }

    #[test]
    fn datagrams_reach_the_registered_callback() {
        let mut receiver = UdpService::new(loopback_config()).unwrap();
        let receiver_addr = receiver.recv_addr().unwrap();

        let (tx, rx) = mpsc::channel();
        receiver.set_data_handler(move |data| {
            let _ = tx.send(data.to_vec());
        });
        receiver.start_receiving();

        let sender = UdpService::new(UdpConfig {
            server_ip: receiver_addr.ip().to_string(),
            server_port: receiver_addr.port(),
            client_ip: "127.0.0.1".to_string(),
            client_port: 0,
        })
        .unwrap();
        sender.send(b"hello").unwrap();

        let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(received, b"hello");

        receiver.close();
    }

    #[test]
    fn a_panicking_callback_does_not_kill_the_listener() {
        let mut receiver = UdpService::new(loopback_config()).unwrap();
        let receiver_addr = receiver.recv_addr().unwrap();

        let (tx, rx) = mpsc::channel();
        receiver.set_data_handler(move |data| {
            if data == b"boom" {
                panic!("handler failure");
            }
            let _ = tx.send(data.to_vec());
        });
        receiver.start_receiving();

        let sender = UdpService::new(UdpConfig {
            server_ip: receiver_addr.ip().to_string(),
            server_port: receiver_addr.port(),
            client_ip: "127.0.0.1".to_string(),
            client_port: 0,
        })
        .unwrap();

        sender.send(b"boom").unwrap();
        std::thread::sleep(Duration::from_millis(20));
        sender.send(b"ok").unwrap();

        let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(received, b"ok");

        receiver.close();
    }

    #[test]
    fn close_is_idempotent() {
        let mut service = UdpService::new(loopback_config()).unwrap();
        service.start_receiving();
        service.close();
        service.close();
        assert!(service.listener.is_none());
    }

    #[test]
    fn start_receiving_twice_keeps_one_listener() {
        let mut service = UdpService::new(loopback_config()).unwrap();
        service.start_receiving();
        service.start_receiving();
        service.close();
    }
}
