//! # LanSim - Topology and reachability model for small simulated LANs
//!
//! This library models a minimal local-area network: end hosts ("computers")
//! with addressed network interfaces, a multiplexing switch that binds host
//! interfaces to numbered ports, and a connectivity-check protocol ("ping")
//! that produces deterministic reachability verdicts from the topology.
//!
//! ## Overview
//!
//! The core of the model is topology and routing state: interface lifecycle
//! management, automatic routing-table maintenance as interfaces come and go,
//! switch port exclusivity with forced reconnection, and a reachability check
//! that consults the derived state. Connection state is structural - the model
//! carries no frames, timing, or queuing.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `iface`: interface addressing, validation, and per-device interface tables
//! - `routing`: routing-table maintenance, one metric entry per live interface
//! - `device`: end-host devices and the fabric attachment seam
//! - `switch`: fixed-capacity switch fabric with port binding rules
//! - `ping`: the connectivity-check protocol and its closed response set
//! - `registry`: serializable snapshot records of a live topology
//!
//! ## Example Usage
//!
//! ```rust
//! use lansim::device::Computer;
//! use lansim::iface::Interface;
//! use lansim::switch::Switch;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! // Describe an interface, then hand it to a host
//! let mut template = Interface::new("eth0");
//! template.set_address("192.168.10.10")?;
//! template.set_prefix_len(22)?;
//! template.set_gateway("192.168.170.1")?;
//!
//! let host = Rc::new(RefCell::new(Computer::new("toto")));
//! host.borrow_mut().add_interface("eth0", Some(&template))?;
//! host.borrow_mut().add_interface("eth1", None)?;
//!
//! // Wire the host into a fabric
//! let mut fabric = Switch::new();
//! fabric.connect(1, &host, "eth0", false)?;
//!
//! // No cross-device route exists for this destination
//! let response = host.borrow_mut().ping("192.168.46.10");
//! assert_eq!(response.code(), 504);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Validation and fabric errors are typed `thiserror` enums
//! (`iface::InterfaceError`, `switch::SwitchError`) that surface immediately
//! and leave prior state untouched. Ping outcomes are not errors but
//! data-carrying results (`ping::PingResponse`) keyed by response code.

pub mod iface;
pub mod routing;
pub mod device;
pub mod switch;
pub mod ping;
pub mod registry;
