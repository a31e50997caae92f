//! Plain-text rendering for engine output.

use mentor_core::{
    AssignmentDigest, GoalAnalysis, Plan, PlanOverview, Progress, TaskCompletion,
};

pub fn print_goal_analysis(verdict: &GoalAnalysis) {
    let goal = &verdict.analysis;
    println!("Goal: {}", goal.main_goal);
    println!(
        "Type: {:?} | Difficulty: {:?} | Estimated: {}",
        goal.goal_type, goal.difficulty, goal.estimated_duration
    );
    if !goal.description.is_empty() {
        println!("\n{}", goal.description);
    }
    if !goal.key_milestones.is_empty() {
        println!("\nMilestones:");
        for milestone in &goal.key_milestones {
            println!("  - {milestone}");
        }
    }
    if verdict.requires_input {
        println!("\nAnswer these to sharpen the plan (pass --answer \"question=answer\"):");
        for question in &goal.clarifying_questions {
            println!("  ? {question}");
        }
    }
}

pub fn print_plan(plan: &Plan) {
    println!("{} ({})", plan.plan_title, plan.total_duration);
    for phase in &plan.phases {
        println!("\nPhase {}: {} [{}]", phase.phase_number, phase.phase_name, phase.duration);
        println!("  {}", phase.description);
        for task in &phase.tasks {
            let automation = if task.can_automate { " [auto]" } else { "" };
            println!(
                "  {} {:?} {}{} ({})",
                task.task_id, task.priority, task.task_name, automation, task.estimated_time
            );
        }
    }
    if !plan.automation_plan.automatable.is_empty() {
        println!("\nThe platform can take over:");
        for name in &plan.automation_plan.automatable {
            println!("  * {name}");
        }
    }
}

pub fn print_progress(progress: &Progress) {
    println!(
        "Progress: {}% | phase {} | {} task(s) done",
        progress.overall_progress, progress.current_phase, progress.completed_tasks
    );
}

pub fn print_overview(overview: &PlanOverview) {
    if !overview.has_plan {
        println!("No active plan. Create one with: mentor plan create \"<goal>\"");
        return;
    }
    if let Some(plan) = &overview.plan {
        print_plan(plan);
    }
    if let Some(progress) = &overview.progress {
        println!();
        print_progress(progress);
    }
}

pub fn print_completion(outcome: &TaskCompletion) {
    if outcome.success {
        println!("Marked complete.");
    } else {
        println!("No such task in the active plan.");
    }
    print_progress(&outcome.progress);
}

pub fn print_digest(digest: &AssignmentDigest) {
    let analysis = &digest.workload_analysis;
    println!(
        "{} item(s), {:.1}h estimated | due within the week: {} ({:.1}h) | load: {:?}",
        analysis.total_items,
        analysis.total_estimated_hours,
        analysis.due_within_week,
        analysis.hours_due_within_week,
        analysis.intensity
    );

    if !digest.urgent_tasks.is_empty() {
        println!("\nNeeds attention now:");
        for item in &digest.urgent_tasks {
            println!(
                "  ! {} (due {}, {} day(s) left): {}",
                item.title, item.due_date, item.days_remaining, item.reason
            );
        }
    }

    if !digest.study_schedule.weekly.is_empty() {
        println!("\nThis week:");
        for allocation in &digest.study_schedule.weekly {
            println!("  {} (due {}):", allocation.title, allocation.due_date);
            for entry in &allocation.entries {
                println!("    {} {} - {:.1}h", entry.date, entry.day, entry.hours);
            }
            if allocation.unallocated_hours > 0.0 {
                println!("    !! {:.1}h does not fit before the deadline", allocation.unallocated_hours);
            }
        }
    }

    if !digest.study_schedule.recommendations.is_empty() {
        println!("\nRecommendations:");
        for line in &digest.study_schedule.recommendations {
            println!("  - {line}");
        }
    }
}
