use crate::model::ids::{CourseId, LessonId, ModuleId};
use crate::model::lesson::{Lesson, LessonStatus};
use crate::model::progress::ProgressSnapshot;

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// An ordered grouping of lessons within a course.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    id: ModuleId,
    title: String,
    order_index: u32,
    lessons: Vec<Lesson>,
    completed_lessons: u32,
    total_lessons: u32,
}

impl Module {
    /// Build a module; lessons are put in `order_index` order.
    ///
    /// `total_lessons` starts as the number of lessons given.
    #[must_use]
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        order_index: u32,
        mut lessons: Vec<Lesson>,
    ) -> Self {
        lessons.sort_by_key(Lesson::order_index);
        let total_lessons = u32::try_from(lessons.len()).unwrap_or(u32::MAX);
        let completed_lessons = u32::try_from(
            lessons
                .iter()
                .filter(|lesson| lesson.status().is_completed())
                .count(),
        )
        .unwrap_or(u32::MAX);
        Self {
            id,
            title: title.into(),
            order_index,
            lessons,
            completed_lessons,
            total_lessons,
        }
    }

    /// Override the counters with values reported by the backend.
    #[must_use]
    pub fn with_counts(mut self, completed_lessons: u32, total_lessons: u32) -> Self {
        self.completed_lessons = completed_lessons;
        self.total_lessons = total_lessons;
        self
    }

    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn order_index(&self) -> u32 {
        self.order_index
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    pub fn lesson_mut(&mut self, id: LessonId) -> Option<&mut Lesson> {
        self.lessons.iter_mut().find(|lesson| lesson.id() == id)
    }

    #[must_use]
    pub fn completed_lessons(&self) -> u32 {
        self.completed_lessons
    }

    #[must_use]
    pub fn total_lessons(&self) -> u32 {
        self.total_lessons
    }

    pub fn set_completed_lessons(&mut self, completed: u32) {
        self.completed_lessons = completed;
    }

    pub fn increment_completed(&mut self) {
        self.completed_lessons = self.completed_lessons.saturating_add(1);
    }

    /// Share of completed lessons, as an integer percentage.
    #[must_use]
    pub fn progress_percentage(&self) -> u32 {
        percentage(self.completed_lessons, self.total_lessons)
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course with its module/lesson tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: CourseId,
    title: String,
    slug: String,
    modules: Vec<Module>,
}

impl Course {
    /// Build a course; modules are put in `order_index` order.
    ///
    /// Sorting is stable, so duplicate indices keep the order they were received in.
    #[must_use]
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        slug: impl Into<String>,
        mut modules: Vec<Module>,
    ) -> Self {
        modules.sort_by_key(Module::order_index);
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            modules,
        }
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|module| module.id() == id)
    }

    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.iter_mut().find(|module| module.id() == id)
    }

    /// Module at the given position in traversal order.
    #[must_use]
    pub fn module_at(&self, index: usize) -> Option<&Module> {
        self.modules.get(index)
    }

    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<(&Module, &Lesson)> {
        self.modules
            .iter()
            .find_map(|module| module.lesson(id).map(|lesson| (module, lesson)))
    }

    /// Total number of lessons present in the tree.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|module| module.lessons().len()).sum()
    }

    /// Aggregate completion across all modules, as an integer percentage.
    #[must_use]
    pub fn overall_progress(&self) -> u32 {
        let (completed, total) = self.modules.iter().fold((0u32, 0u32), |(c, t), module| {
            (
                c.saturating_add(module.completed_lessons()),
                t.saturating_add(module.total_lessons()),
            )
        });
        percentage(completed, total)
    }

    /// Merge a server progress snapshot into the tree by id lookup.
    ///
    /// Ids missing from the tree are ignored. Lessons missing from the snapshot keep
    /// their current values.
    pub fn merge_progress(&mut self, snapshot: &ProgressSnapshot) {
        for module_progress in &snapshot.module_progress {
            let Some(module) = self.module_mut(module_progress.module_id) else {
                continue;
            };
            module.set_completed_lessons(module_progress.completed_lessons);
            for lesson_progress in &module_progress.lessons {
                if let Some(lesson) = module.lesson_mut(lesson_progress.lesson_id) {
                    lesson.apply_progress(
                        lesson_progress.status,
                        lesson_progress.progress_percentage,
                    );
                }
            }
        }
    }

    /// Write an acknowledged playback save back into the tree.
    ///
    /// Completed lessons keep their 100%; any other lesson becomes in progress.
    /// Returns `false` if the lesson is not in this course.
    pub fn record_saved_progress(&mut self, lesson_id: LessonId, percentage: u32) -> bool {
        let Some(lesson) = self
            .modules
            .iter_mut()
            .find_map(|module| module.lesson_mut(lesson_id))
        else {
            return false;
        };
        if !lesson.status().is_completed() {
            lesson.apply_progress(LessonStatus::InProgress, percentage.min(100));
        }
        true
    }

    /// Flip a lesson to completed and bump its module counter.
    ///
    /// The counter only moves when the lesson was not already completed.
    /// Returns `false` if the lesson is not in this course.
    pub fn complete_lesson(&mut self, module_id: ModuleId, lesson_id: LessonId) -> bool {
        let Some(module) = self.module_mut(module_id) else {
            return false;
        };
        let Some(lesson) = module.lesson_mut(lesson_id) else {
            return false;
        };
        if lesson.mark_completed() {
            module.increment_completed();
        }
        true
    }
}

fn percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let value = u64::from(part) * 100 / u64::from(total);
    u32::try_from(value.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lesson::{LessonKind, LessonStatus};
    use crate::model::progress::{LessonProgress, ModuleProgress};

    fn lesson(id: u64, order: u32) -> Lesson {
        Lesson::new(LessonId::new(id), format!("Lesson {id}"), LessonKind::Video, order)
    }

    fn two_by_two() -> Course {
        Course::new(
            CourseId::new(1),
            "Rust",
            "rust",
            vec![
                Module::new(ModuleId::new(20), "Second", 2, vec![lesson(3, 1), lesson(4, 2)]),
                Module::new(ModuleId::new(10), "First", 1, vec![lesson(2, 2), lesson(1, 1)]),
            ],
        )
    }

    #[test]
    fn new_orders_modules_and_lessons_by_order_index() {
        let course = two_by_two();
        let modules: Vec<_> = course.modules().iter().map(Module::id).collect();
        assert_eq!(modules, vec![ModuleId::new(10), ModuleId::new(20)]);
        let lessons: Vec<_> = course.modules()[0].lessons().iter().map(Lesson::id).collect();
        assert_eq!(lessons, vec![LessonId::new(1), LessonId::new(2)]);
    }

    #[test]
    fn merge_progress_updates_known_ids_only() {
        let mut course = two_by_two();
        let snapshot = ProgressSnapshot {
            module_progress: vec![
                ModuleProgress {
                    module_id: ModuleId::new(10),
                    completed_lessons: 1,
                    lessons: vec![
                        LessonProgress {
                            lesson_id: LessonId::new(1),
                            status: LessonStatus::Completed,
                            progress_percentage: 100,
                        },
                        LessonProgress {
                            lesson_id: LessonId::new(99),
                            status: LessonStatus::Completed,
                            progress_percentage: 100,
                        },
                    ],
                },
                ModuleProgress {
                    module_id: ModuleId::new(77),
                    completed_lessons: 5,
                    lessons: Vec::new(),
                },
            ],
        };

        course.merge_progress(&snapshot);

        let (module, first) = course.lesson(LessonId::new(1)).unwrap();
        assert_eq!(module.completed_lessons(), 1);
        assert_eq!(first.status(), LessonStatus::Completed);
        let (_, second) = course.lesson(LessonId::new(2)).unwrap();
        assert_eq!(second.status(), LessonStatus::NotStarted);
        assert_eq!(course.module(ModuleId::new(20)).unwrap().completed_lessons(), 0);
    }

    #[test]
    fn complete_lesson_counts_once() {
        let mut course = two_by_two();
        assert!(course.complete_lesson(ModuleId::new(10), LessonId::new(2)));
        assert!(course.complete_lesson(ModuleId::new(10), LessonId::new(2)));
        assert_eq!(course.module(ModuleId::new(10)).unwrap().completed_lessons(), 1);
        assert!(!course.complete_lesson(ModuleId::new(20), LessonId::new(2)));
    }

    #[test]
    fn saved_progress_updates_lesson_but_not_completed_ones() {
        let mut course = two_by_two();
        assert!(course.record_saved_progress(LessonId::new(1), 70));
        let (_, lesson) = course.lesson(LessonId::new(1)).unwrap();
        assert_eq!(lesson.status(), LessonStatus::InProgress);
        assert_eq!(lesson.progress_percentage(), 70);

        course.complete_lesson(ModuleId::new(10), LessonId::new(2));
        assert!(course.record_saved_progress(LessonId::new(2), 30));
        let (_, done) = course.lesson(LessonId::new(2)).unwrap();
        assert_eq!(done.status(), LessonStatus::Completed);
        assert_eq!(done.progress_percentage(), 100);

        assert!(!course.record_saved_progress(LessonId::new(99), 10));
    }

    #[test]
    fn overall_progress_spans_modules() {
        let mut course = two_by_two();
        assert_eq!(course.overall_progress(), 0);
        course.complete_lesson(ModuleId::new(10), LessonId::new(1));
        assert_eq!(course.overall_progress(), 25);
        assert_eq!(course.module(ModuleId::new(10)).unwrap().progress_percentage(), 50);
    }

    #[test]
    fn empty_module_has_zero_progress() {
        let module = Module::new(ModuleId::new(1), "Empty", 1, Vec::new());
        assert_eq!(module.progress_percentage(), 0);
        assert_eq!(module.total_lessons(), 0);
    }
}
