/// User-driven operations, produced by the key handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Re-fetch the latest block number; a changed number cascades into a
    /// block fetch via the controller's observer
    Refresh,
    /// Show or hide the transaction list; rendering only, no I/O
    ToggleTransactions,
    /// Fetch the receipt for the transaction at this index in the current list
    SelectTransaction(usize),
    CursorUp,
    CursorDown,
    EnterAddressMode,
    LeaveAddressMode,
    /// One keystroke appended verbatim to the address query
    AddressInput(char),
    AddressBackspace,
    /// Balance lookup for the current address query (button or Enter)
    LookupBalance,
    Quit,
}
