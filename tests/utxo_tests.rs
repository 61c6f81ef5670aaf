use utxo_ledger::utxo::balance;
use utxo_ledger::{find_spendable, OutPoint, Transaction, TxInput, TxOutput, UtxoQuery, UtxoSet};

// 辅助函数：按 (所有者, 金额) 列表创建交易
fn tx_paying(memo: &str, outputs: &[(&[u8], u64)]) -> Transaction {
    Transaction::new(
        vec![TxInput::new(Vec::new(), -1, memo.as_bytes().to_vec())],
        outputs
            .iter()
            .map(|(owner, value)| TxOutput::with_pub_key_hash(*value, owner.to_vec()))
            .collect(),
    )
}

fn sample_set(alice: &[u8], bob: &[u8]) -> UtxoSet {
    let mut set = UtxoSet::new();
    set.insert_transaction(&tx_paying("one", &[(alice, 10), (bob, 100), (alice, 15)]));
    set.insert_transaction(&tx_paying("two", &[(bob, 7), (alice, 20)]));
    set.insert_transaction(&tx_paying("three", &[(alice, 1)]));
    set
}

#[test]
fn test_selection_only_returns_owned_outputs() {
    let alice = [1u8; 20];
    let bob = [2u8; 20];
    let set = sample_set(&alice, &bob);

    for target in [1, 10, 11, 30, 46, 1000] {
        let (accumulated, chosen) = find_spendable(&alice, target, &set);

        let mut sum = 0;
        for outpoint in &chosen {
            let output = set.get(outpoint).unwrap();
            assert!(output.is_locked_with(&alice));
            sum += output.value;
        }
        assert_eq!(accumulated, sum);
    }
}

#[test]
fn test_selection_is_greedy_in_index_order() {
    let alice = [1u8; 20];
    let bob = [2u8; 20];
    let set = sample_set(&alice, &bob);

    let owned: Vec<OutPoint> = set
        .unspent_outputs_by_owner(&alice)
        .into_iter()
        .map(|utxo| utxo.outpoint)
        .collect();

    let (accumulated, chosen) = find_spendable(&alice, 12, &set);
    assert!(accumulated >= 12);
    assert_eq!(chosen[..], owned[..chosen.len()]);

    // 去掉最后一个选中的输出后金额不足
    let last = set.get(chosen.last().unwrap()).unwrap().value;
    assert!(accumulated - last < 12);
}

#[test]
fn test_underfunded_selection_returns_everything_owned() {
    let alice = [1u8; 20];
    let bob = [2u8; 20];
    let set = sample_set(&alice, &bob);

    let (accumulated, chosen) = find_spendable(&alice, 1000, &set);
    assert_eq!(accumulated, 46);
    assert_eq!(chosen.len(), 4);
    assert_eq!(balance(&alice, &set), 46);
    assert_eq!(balance(&bob, &set), 107);
}

#[test]
fn test_unknown_owner_selects_nothing() {
    let set = sample_set(&[1u8; 20], &[2u8; 20]);

    let (accumulated, chosen) = find_spendable(&[9u8; 20], 5, &set);
    assert_eq!(accumulated, 0);
    assert!(chosen.is_empty());
}

#[test]
fn test_spent_outputs_are_not_selected() {
    let alice = [1u8; 20];
    let funding = tx_paying("solo", &[(&alice[..], 50)]);
    let mut set = UtxoSet::new();
    set.insert_transaction(&funding);

    let outpoint = OutPoint {
        txid: funding.id.clone(),
        index: 0,
    };
    assert!(set.contains(&outpoint));
    set.spend(&outpoint);

    assert_eq!(find_spendable(&alice, 1, &set), (0, vec![]));
}
