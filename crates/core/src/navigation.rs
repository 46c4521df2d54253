//! Lesson-to-lesson navigation across module boundaries.
//!
//! The module/lesson tree is flattened once into traversal order, and a cursor
//! moves over that sequence. Moving past either end is a no-op.

use std::collections::HashSet;

use crate::model::{Course, LessonId, ModuleId};

/// Location of a lesson in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub module_index: usize,
    pub lesson_index: usize,
    pub module_id: ModuleId,
    pub lesson_id: LessonId,
}

/// Cursor over the flattened lessons of a course, plus module expand state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    order: Vec<Position>,
    cursor: Option<usize>,
    expanded: HashSet<ModuleId>,
}

impl Navigator {
    /// Flatten `course` and place the cursor on its first lesson.
    ///
    /// Modules without lessons contribute nothing to the order. The module holding
    /// the first lesson starts expanded.
    #[must_use]
    pub fn new(course: &Course) -> Self {
        let order: Vec<Position> = course
            .modules()
            .iter()
            .enumerate()
            .flat_map(|(module_index, module)| {
                module
                    .lessons()
                    .iter()
                    .enumerate()
                    .map(move |(lesson_index, lesson)| Position {
                        module_index,
                        lesson_index,
                        module_id: module.id(),
                        lesson_id: lesson.id(),
                    })
            })
            .collect();

        let mut navigator = Self {
            cursor: None,
            order,
            expanded: HashSet::new(),
        };
        if !navigator.order.is_empty() {
            navigator.move_to(0);
        }
        navigator
    }

    #[must_use]
    pub fn current(&self) -> Option<Position> {
        self.cursor.and_then(|index| self.order.get(index).copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Point the cursor at a specific lesson. No access gating applies.
    ///
    /// Returns `None` and leaves the cursor alone if the pair is not in the course.
    pub fn select(&mut self, module_id: ModuleId, lesson_id: LessonId) -> Option<Position> {
        let index = self
            .order
            .iter()
            .position(|p| p.module_id == module_id && p.lesson_id == lesson_id)?;
        Some(self.move_to(index))
    }

    /// Step to the following lesson, crossing into the next module when needed.
    pub fn next(&mut self) -> Option<Position> {
        let index = self.peek(1)?;
        Some(self.move_to(index))
    }

    /// Step to the preceding lesson, landing on the previous module's last lesson
    /// when crossing a boundary.
    pub fn previous(&mut self) -> Option<Position> {
        let index = self.peek(-1)?;
        Some(self.move_to(index))
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.peek(1).is_some()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.peek(-1).is_some()
    }

    #[must_use]
    pub fn is_expanded(&self, module_id: ModuleId) -> bool {
        self.expanded.contains(&module_id)
    }

    pub fn expand(&mut self, module_id: ModuleId) {
        self.expanded.insert(module_id);
    }

    /// Flip a module between expanded and collapsed. Returns the new state.
    pub fn toggle_module(&mut self, module_id: ModuleId) -> bool {
        if self.expanded.remove(&module_id) {
            false
        } else {
            self.expanded.insert(module_id);
            true
        }
    }

    fn peek(&self, step: isize) -> Option<usize> {
        let index = self.cursor?.checked_add_signed(step)?;
        (index < self.order.len()).then_some(index)
    }

    fn move_to(&mut self, index: usize) -> Position {
        let position = self.order[index];
        let crossed = self
            .current()
            .is_none_or(|current| current.module_id != position.module_id);
        if crossed {
            self.expanded.insert(position.module_id);
        }
        self.cursor = Some(index);
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseId, Lesson, LessonKind, Module};

    fn course(shape: &[usize]) -> Course {
        let mut next_lesson = 0;
        let modules = shape
            .iter()
            .enumerate()
            .map(|(m, &count)| {
                let lessons = (0..count)
                    .map(|l| {
                        next_lesson += 1;
                        Lesson::new(
                            LessonId::new(next_lesson),
                            format!("L{next_lesson}"),
                            LessonKind::Text,
                            u32::try_from(l).unwrap(),
                        )
                    })
                    .collect();
                Module::new(
                    ModuleId::new(m as u64 + 1),
                    format!("M{}", m + 1),
                    u32::try_from(m).unwrap(),
                    lessons,
                )
            })
            .collect();
        Course::new(CourseId::new(1), "Course", "course", modules)
    }

    #[test]
    fn starts_on_first_lesson_with_its_module_expanded() {
        let nav = Navigator::new(&course(&[2, 2]));
        let current = nav.current().unwrap();
        assert_eq!(current.lesson_id, LessonId::new(1));
        assert!(nav.is_expanded(ModuleId::new(1)));
        assert!(!nav.is_expanded(ModuleId::new(2)));
        assert!(!nav.has_previous());
    }

    #[test]
    fn next_crosses_into_following_module_and_expands_it() {
        let mut nav = Navigator::new(&course(&[2, 2]));
        nav.select(ModuleId::new(1), LessonId::new(2)).unwrap();

        let landed = nav.next().unwrap();
        assert_eq!(landed.module_id, ModuleId::new(2));
        assert_eq!(landed.lesson_id, LessonId::new(3));
        assert_eq!((landed.module_index, landed.lesson_index), (1, 0));
        assert!(nav.is_expanded(ModuleId::new(2)));
    }

    #[test]
    fn previous_lands_on_last_lesson_of_previous_module() {
        let mut nav = Navigator::new(&course(&[3, 1]));
        nav.select(ModuleId::new(2), LessonId::new(4)).unwrap();
        let landed = nav.previous().unwrap();
        assert_eq!(landed.lesson_id, LessonId::new(3));
        assert_eq!(landed.lesson_index, 2);
    }

    #[test]
    fn next_at_the_very_end_is_an_idempotent_noop() {
        let mut nav = Navigator::new(&course(&[1, 2]));
        nav.select(ModuleId::new(2), LessonId::new(3)).unwrap();
        assert!(!nav.has_next());
        assert!(nav.next().is_none());
        assert!(nav.next().is_none());
        assert_eq!(nav.current().unwrap().lesson_id, LessonId::new(3));
    }

    #[test]
    fn alternating_next_and_previous_returns_to_first_lesson() {
        for shape in [&[1][..], &[2, 2], &[3, 1, 4], &[1, 1, 1]] {
            let mut nav = Navigator::new(&course(shape));
            let first = nav.current().unwrap();
            for _ in 0..nav.len() {
                if nav.next().is_some() {
                    nav.previous();
                }
                assert_eq!(nav.current().unwrap(), first);
            }
        }
    }

    #[test]
    fn walking_forward_visits_every_lesson_in_order() {
        let mut nav = Navigator::new(&course(&[2, 3]));
        let mut seen = vec![nav.current().unwrap().lesson_id.value()];
        while let Some(position) = nav.next() {
            seen.push(position.lesson_id.value());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        let mut back = Vec::new();
        while let Some(position) = nav.previous() {
            back.push(position.lesson_id.value());
        }
        assert_eq!(back, vec![4, 3, 2, 1]);
    }

    #[test]
    fn empty_modules_are_skipped() {
        let mut nav = Navigator::new(&course(&[0, 1, 0, 1]));
        assert_eq!(nav.current().unwrap().module_id, ModuleId::new(2));
        let landed = nav.next().unwrap();
        assert_eq!(landed.module_id, ModuleId::new(4));
        assert!(nav.next().is_none());
    }

    #[test]
    fn empty_course_never_moves() {
        let mut nav = Navigator::new(&course(&[]));
        assert!(nav.is_empty());
        assert!(nav.current().is_none());
        assert!(nav.next().is_none());
        assert!(nav.previous().is_none());
        assert!(nav.select(ModuleId::new(1), LessonId::new(1)).is_none());
    }

    #[test]
    fn select_ignores_unknown_lessons() {
        let mut nav = Navigator::new(&course(&[2]));
        assert!(nav.select(ModuleId::new(1), LessonId::new(42)).is_none());
        assert!(nav.select(ModuleId::new(9), LessonId::new(2)).is_none());
        assert_eq!(nav.current().unwrap().lesson_id, LessonId::new(1));
    }

    #[test]
    fn toggle_flips_expand_state() {
        let mut nav = Navigator::new(&course(&[1, 1]));
        assert!(!nav.toggle_module(ModuleId::new(1)));
        assert!(!nav.is_expanded(ModuleId::new(1)));
        assert!(nav.toggle_module(ModuleId::new(2)));
        assert!(nav.is_expanded(ModuleId::new(2)));
    }
}
