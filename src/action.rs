use crate::system::rank::SortMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    Kill(u32),
    ForceKill(u32),
    SetSort(SortMode),
    CycleSortMode,
    CycleTheme,
    ToggleHelp,
    Refresh,
    None,
}
