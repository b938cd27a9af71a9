//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Administrative configuration records
//!
//! An [`Entity`] is the attribute set an administrator supplies when creating a
//! listener, connector or SSL profile. This crate does not know what any of the
//! attributes mean; it only offers typed lookups with defaults so the layers
//! above can turn a record into a validated configuration.
//!
//! # Example
//!
//! ```
//! use switchyard_entity::Entity;
//!
//! let entity = Entity::new()
//!     .with("port", "5672")
//!     .with("maxFrameSize", 16384)
//!     .with("multiTenant", true);
//!
//! assert_eq!(entity.get_string("port").unwrap(), "5672");
//! assert_eq!(entity.get_long("maxFrameSize").unwrap(), 16384);
//! assert!(entity.opt_bool("multiTenant", false).unwrap());
//! assert_eq!(entity.opt_string("host", Some("127.0.0.1")).unwrap().as_deref(), Some("127.0.0.1"));
//! ```

mod entity;
mod result;
mod value;

pub use self::entity::Entity;
pub use self::result::{EntityError, EntityResult};
pub use self::value::AttributeValue;
