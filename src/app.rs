// ABOUTME: Single-run orchestration - image to model call to summary, files, and rows
// ABOUTME: Aborts before any output if generation fails; file outputs precede the DB write
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Run Orchestration
//!
//! One invocation performs the whole linear pipeline: validate the goal,
//! read and encode the screenshot, call the generator, then produce the
//! console summary, HTML file, JSON file, and database rows, in that order.
//! A failure at the generator step aborts before any output exists. A
//! persistence failure does not retract files already written.

use tracing::info;
use uuid::Uuid;

use crate::config::CoachConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::generator::PlanGenerator;
use crate::image::ImageAttachment;
use crate::llm::LlmProvider;
use crate::models::RunningPlan;
use crate::output::{plan_summary, render_html, render_json, write_atomic};

/// Outcome of one successful run
#[derive(Debug)]
pub struct RunReport {
    /// Identifier assigned to the stored plan
    pub plan_id: Uuid,
    /// The generated plan
    pub plan: RunningPlan,
}

/// Wires config, generator, and database together for a single-shot run
pub struct CoachApp {
    config: CoachConfig,
    generator: PlanGenerator,
    database: Database,
}

impl CoachApp {
    /// Assemble the application from its parts
    #[must_use]
    pub fn new(config: CoachConfig, provider: Box<dyn LlmProvider>, database: Database) -> Self {
        Self {
            config,
            generator: PlanGenerator::new(provider),
            database,
        }
    }

    /// Execute one run end to end
    ///
    /// # Errors
    ///
    /// Propagates the first failure in the pipeline; see the module docs for
    /// which outputs exist when each stage fails.
    pub async fn run(&self) -> AppResult<RunReport> {
        let goal = self.config.goal_text()?;
        let image = ImageAttachment::load(&self.config.image_path).await?;

        let plan = self.generator.generate(goal, image).await?;

        println!("{}", plan_summary(&plan));

        write_atomic(&self.config.html_output, &render_html(&plan))?;
        info!("Wrote {}", self.config.html_output);

        write_atomic(&self.config.json_output, &render_json(&plan)?)?;
        info!("Wrote {}", self.config.json_output);

        let plan_id = self.database.save_plan(&plan).await?;

        Ok(RunReport { plan_id, plan })
    }
}
