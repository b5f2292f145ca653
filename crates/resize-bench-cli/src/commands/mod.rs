// Dweve Resize Bench - Image resize strategy benchmarking
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command implementations.
//!
//! Each command owns its clap argument struct and a function that executes
//! it, so the binaries only parse, dispatch and map errors to exit codes.

mod compare;
mod run;

pub use compare::{compare, CompareArgs};
pub use run::{output_path_for, run, RunArgs, DEFAULT_INPUT, DEFAULT_OUTPUT_DIR};
