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

//! Protocol and configuration constants

/// Smallest max-frame-size the AMQP protocol permits
pub const MIN_MAX_FRAME_SIZE: u32 = 512;

/// Largest session count the protocol engine accepts, also used as the default
pub const MAX_SESSIONS_LIMIT: u32 = 32768;

/// Link capacity used when none is configured
pub const DEFAULT_LINK_CAPACITY: u32 = 250;

/// Host used by the attribute layer when neither `host` nor `addr` is given
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Capacity base used when no session frame count is configured
pub const UNLIMITED_SESSION_FRAMES: u64 = 0x7FFF_FFFF;

/// Upper bound on bytes read from an SSL profile password file
pub const PASSWORD_FILE_MAX: usize = 199;

/// Default scheme of a failover list entry
pub const DEFAULT_FAILOVER_SCHEME: &str = "amqp";

/// Default port of a failover list entry
pub const DEFAULT_FAILOVER_PORT: &str = "5672";
