//! Domain services for the manufacturing dashboard.
//!
//! Services are pure functions over domain models; none of them fail.

pub mod dashboard;
pub mod schedule_groups;
pub mod table;

pub use dashboard::{
    board_ranking, donut_from_totals, machine_donut, split_columns, BoardRow, DonutChart,
    DonutSegment, DEFAULT_DONUT_TOP_N, OTHER_LABEL,
};

pub use schedule_groups::{
    displayable_groups, group_by_machine, group_by_product_operation, Displayable, GroupedTask,
    MachineGroup, OperationGroup, ProductGroup, TimeWindow, MIN_DISPLAY_SPAN_MS, NO_MACHINE,
    NO_OPERATION, NO_PRODUCT,
};

pub use table::{filter_by_keyword, sort_by_column, Searchable, SortOrder};
